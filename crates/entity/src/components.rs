//! Components Entity
//!
//! Technical components with up to two responsible employees.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:              i32,
    #[sea_orm(unique)]
    pub name:            String,
    pub component_type:  String,
    pub link:            Option<String>,
    pub owner_id:        Option<i32>,
    pub second_owner_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub description:     String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::OwnerId",
        to = "super::employees::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::SecondOwnerId",
        to = "super::employees::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    SecondOwner,
    #[sea_orm(has_many = "super::product_components::Entity")]
    ProductComponents,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl Related<super::product_components::Entity> for Entity {
    fn to() -> RelationDef { Relation::ProductComponents.def() }
}

impl ActiveModelBehavior for ActiveModel {}
