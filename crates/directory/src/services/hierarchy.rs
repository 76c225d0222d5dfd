//! # Self-Referencing Trees
//!
//! Departments and products form forests through a nullable `parent_id`.
//! Every save path validates the new parent here: it must exist, must not be
//! the node itself and must not be one of the node's descendants. The walk
//! goes up the whole ancestor chain, locking each row on PostgreSQL so a
//! concurrent re-parent cannot slip a cycle in between check and write.

use std::collections::HashSet;

use entity::{departments, products, Departments, Products};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use super::supports_row_locks;

/// An entity with an integer id and a nullable parent reference to itself
pub trait TreeNode: EntityTrait {
    /// Human readable kind used in messages
    const KIND: &'static str;

    fn id_column() -> Self::Column;
    fn parent_column() -> Self::Column;
    fn parent_of(model: &Self::Model) -> Option<i32>;
}

impl TreeNode for Departments {
    const KIND: &'static str = "department";

    fn id_column() -> Self::Column { departments::Column::Id }

    fn parent_column() -> Self::Column { departments::Column::ParentId }

    fn parent_of(model: &Self::Model) -> Option<i32> { model.parent_id }
}

impl TreeNode for Products {
    const KIND: &'static str = "product";

    fn id_column() -> Self::Column { products::Column::Id }

    fn parent_column() -> Self::Column { products::Column::ParentId }

    fn parent_of(model: &Self::Model) -> Option<i32> { model.parent_id }
}

/// Load a node, locking it for the rest of the transaction where supported
pub async fn find_for_update<E: TreeNode, C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<E::Model>> {
    let mut query = E::find().filter(E::id_column().eq(id));
    if supports_row_locks(db) {
        query = query.lock_exclusive();
    }
    Ok(query.one(db).await?)
}

/// Check that `parent_id` may become the parent of `node_id`.
///
/// `node_id` is `None` for a node that does not exist yet. Failures are
/// reported as field errors on `parent_id`.
pub async fn validate_parent<E: TreeNode, C: ConnectionTrait>(
    db: &C,
    node_id: Option<i32>,
    parent_id: Option<i32>,
) -> Result<()> {
    let Some(parent_id) = parent_id
    else {
        return Ok(());
    };

    if node_id == Some(parent_id) {
        return Err(AppError::field(
            "parent_id",
            format!("A {} cannot be its own parent", E::KIND),
        ));
    }

    let mut visited = HashSet::new();
    let mut current = Some(parent_id);

    while let Some(id) = current {
        if !visited.insert(id) {
            // Pre-existing loop above us; nothing new to detect
            break;
        }

        let Some(model) = find_for_update::<E, _>(db, id).await?
        else {
            if id == parent_id {
                return Err(AppError::field(
                    "parent_id",
                    format!("Parent {} {} does not exist", E::KIND, parent_id),
                ));
            }
            break;
        };

        current = E::parent_of(&model);
        if current.is_some() && current == node_id {
            return Err(AppError::field(
                "parent_id",
                format!(
                    "A {} cannot be placed under its own descendant {}",
                    E::KIND,
                    parent_id
                ),
            ));
        }
    }

    Ok(())
}

/// Direct children of a node, ordered by id
pub async fn children<E: TreeNode, C: ConnectionTrait>(db: &C, id: i32) -> Result<Vec<E::Model>> {
    Ok(E::find()
        .filter(E::parent_column().eq(id))
        .order_by_asc(E::id_column())
        .all(db)
        .await?)
}

/// Nodes without a parent, ordered by id
pub async fn roots<E: TreeNode, C: ConnectionTrait>(db: &C) -> Result<Vec<E::Model>> {
    Ok(E::find()
        .filter(E::parent_column().is_null())
        .order_by_asc(E::id_column())
        .all(db)
        .await?)
}

/// Refuse to delete a node that still has children
pub async fn ensure_leaf<E: TreeNode, C: ConnectionTrait>(db: &C, id: i32) -> Result<()>
where
    E::Model: Sync,
{
    let count = E::find()
        .filter(E::parent_column().eq(id))
        .count(db)
        .await?;

    if count > 0 {
        return Err(AppError::conflict(format!(
            "The {} {} still has {} child {}(s)",
            E::KIND,
            id,
            count,
            E::KIND
        )));
    }
    Ok(())
}
