//! Product Components Entity
//!
//! Many-to-many join between products and components, unique per pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:           i32,
    pub product_id:   i32,
    pub component_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::components::Entity",
        from = "Column::ComponentId",
        to = "super::components::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Component,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl Related<super::components::Entity> for Entity {
    fn to() -> RelationDef { Relation::Component.def() }
}

impl ActiveModelBehavior for ActiveModel {}
