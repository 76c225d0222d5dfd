//! Skills Entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:   i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee_skills::Entity")]
    EmployeeSkills,
}

impl Related<super::employee_skills::Entity> for Entity {
    fn to() -> RelationDef { Relation::EmployeeSkills.def() }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef { super::employee_skills::Relation::Employee.def() }

    fn via() -> Option<RelationDef> { Some(super::employee_skills::Relation::Skill.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}
