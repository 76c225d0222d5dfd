//! Team Members Entity
//!
//! Links one employee to one team with a free-form role label.
//! The (team_id, employee_id) pair is unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role given to the team manager's membership row
pub const MANAGER_ROLE: &str = "Руководитель";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:          i32,
    pub team_id:     i32,
    pub employee_id: i32,
    pub role:        String,
    pub joined_at:   chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Team,
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef { Relation::Team.def() }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef { Relation::Employee.def() }
}

impl ActiveModelBehavior for ActiveModel {}
