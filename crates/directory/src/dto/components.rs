//! # Component Data Transfer Objects

use entity::components;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{double_option, ListQuery};

/// Request to create a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateComponentRequest {
    #[validate(length(
        min = 1,
        max = 250,
        message = "Component name must be between 1 and 250 characters"
    ))]
    pub name:            String,
    #[validate(length(
        min = 1,
        max = 150,
        message = "Component type must be between 1 and 150 characters"
    ))]
    pub component_type:  String,
    #[validate(url(message = "Link must be a valid URL"), length(max = 200, message = "Link must not exceed 200 characters"))]
    pub link:            Option<String>,
    pub owner_id:        Option<i32>,
    pub second_owner_id: Option<i32>,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description:     String,
}

/// Partial update of a component. `Some(None)` clears an optional value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateComponentRequest {
    #[validate(length(
        min = 1,
        max = 250,
        message = "Component name must be between 1 and 250 characters"
    ))]
    pub name:            Option<String>,
    #[validate(length(
        min = 1,
        max = 150,
        message = "Component type must be between 1 and 150 characters"
    ))]
    pub component_type:  Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub link:            Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub owner_id:        Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub second_owner_id: Option<Option<i32>>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description:     Option<String>,
}

/// Component list filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComponentListQuery {
    /// Search over name, description and owner full name
    #[serde(flatten)]
    pub list:           ListQuery,
    pub component_type: Option<String>,
}

/// Response for a single component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentResponse {
    pub id:              i32,
    pub name:            String,
    pub component_type:  String,
    pub link:            Option<String>,
    pub owner_id:        Option<i32>,
    pub second_owner_id: Option<i32>,
    pub description:     String,
}

impl From<components::Model> for ComponentResponse {
    fn from(model: components::Model) -> Self {
        Self {
            id:              model.id,
            name:            model.name,
            component_type:  model.component_type,
            link:            model.link,
            owner_id:        model.owner_id,
            second_owner_id: model.second_owner_id,
            description:     model.description,
        }
    }
}
