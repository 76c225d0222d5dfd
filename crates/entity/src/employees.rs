//! Employees Entity
//!
//! Employee records: profile attributes, login identity and department membership.
//!
//! CUSTOMIZATION REGION START: employee_entity_custom_types
//! This region is preserved during entity regeneration. Add custom types and implementations here.
//! CUSTOMIZATION REGION END

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::{EmployeeStatus, EmploymentType, Grade};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:              i32,
    pub full_name:       String,
    #[sea_orm(unique)]
    pub email:           String,
    #[serde(skip_serializing)]
    pub password_hash:   Option<String>,
    pub position:        String,
    pub birth_date:      chrono::NaiveDate,
    pub hire_date:       Option<chrono::NaiveDate>,
    pub avatar:          Option<String>,
    #[sea_orm(unique)]
    pub telegram:        Option<String>,
    #[sea_orm(unique)]
    pub telephone:       String,
    pub employment_type: EmploymentType,
    pub status:          EmployeeStatus,
    pub location:        String,
    pub grade:           Option<Grade>,
    #[sea_orm(column_type = "Text")]
    pub bio:             String,
    pub is_outsource:    bool,
    pub is_superuser:    bool,
    pub department_id:   Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DepartmentId",
        to = "super::departments::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Department,
    #[sea_orm(has_many = "super::team_members::Entity")]
    TeamMembers,
    #[sea_orm(has_many = "super::employee_skills::Entity")]
    EmployeeSkills,
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef { Relation::Department.def() }
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::TeamMembers.def() }
}

impl Related<super::employee_skills::Entity> for Entity {
    fn to() -> RelationDef { Relation::EmployeeSkills.def() }
}

impl Related<super::skills::Entity> for Entity {
    fn to() -> RelationDef { super::employee_skills::Relation::Skill.def() }

    fn via() -> Option<RelationDef> { Some(super::employee_skills::Relation::Employee.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

// CUSTOMIZATION REGION START: employee_entity_methods
impl Model {
    /// Whether the employee can still act in the system
    pub fn is_active(&self) -> bool { self.status != EmployeeStatus::Fired }
}
// CUSTOMIZATION REGION END
