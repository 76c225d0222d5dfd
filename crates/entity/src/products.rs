//! Products Entity
//!
//! Products form a tree through `parent_id` and group teams and components.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:          i32,
    #[sea_orm(unique)]
    pub name:        String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub manager_id:  Option<i32>,
    pub parent_id:   Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::ManagerId",
        to = "super::employees::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Manager,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Parent,
    #[sea_orm(has_many = "super::teams::Entity")]
    Teams,
    #[sea_orm(has_many = "super::product_components::Entity")]
    ProductComponents,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef { Relation::Manager.def() }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef { Relation::Teams.def() }
}

impl Related<super::product_components::Entity> for Entity {
    fn to() -> RelationDef { Relation::ProductComponents.def() }
}

impl Related<super::components::Entity> for Entity {
    fn to() -> RelationDef { super::product_components::Relation::Component.def() }

    fn via() -> Option<RelationDef> { Some(super::product_components::Relation::Product.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}
