//! Additional Fields Entity
//!
//! Free-form name/description fields attached to any entity through an (owner_kind, owner_id) pair.
//! Rows are removed in the same transaction that deletes their owner.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::OwnerKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "additional_fields")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:          i32,
    pub owner_kind:  OwnerKind,
    pub owner_id:    i32,
    pub name:        String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
