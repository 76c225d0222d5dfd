//! Employee Skills Entity
//!
//! Join between employees and skills, unique per pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_skills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:          i32,
    pub employee_id: i32,
    pub skill_id:    i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::skills::Entity",
        from = "Column::SkillId",
        to = "super::skills::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Skill,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef { Relation::Employee.def() }
}

impl Related<super::skills::Entity> for Entity {
    fn to() -> RelationDef { Relation::Skill.def() }
}

impl ActiveModelBehavior for ActiveModel {}
