//! # Product Data Transfer Objects

use entity::products;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::double_option;

/// Request to create a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(
        min = 1,
        max = 250,
        message = "Product name must be between 1 and 250 characters"
    ))]
    pub name:        String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: String,
    pub manager_id:  Option<i32>,
    pub parent_id:   Option<i32>,
}

/// Partial update of a product. `Some(None)` clears a reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(
        min = 1,
        max = 250,
        message = "Product name must be between 1 and 250 characters"
    ))]
    pub name:        Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub manager_id:  Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id:   Option<Option<i32>>,
}

/// Components to link to or unlink from a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct ProductComponentsRequest {
    #[validate(length(min = 1, message = "At least one component is required"))]
    pub component_ids: Vec<i32>,
}

/// Response for a single product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductResponse {
    pub id:          i32,
    pub name:        String,
    pub description: String,
    pub manager_id:  Option<i32>,
    pub parent_id:   Option<i32>,
}

impl From<products::Model> for ProductResponse {
    fn from(model: products::Model) -> Self {
        Self {
            id:          model.id,
            name:        model.name,
            description: model.description,
            manager_id:  model.manager_id,
            parent_id:   model.parent_id,
        }
    }
}
