//! # Department Data Transfer Objects

use entity::departments;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::double_option;

/// Request to create a department
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    #[validate(length(
        min = 1,
        max = 250,
        message = "Department name must be between 1 and 250 characters"
    ))]
    pub name:        String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: String,
    pub owner_id:    Option<i32>,
    pub parent_id:   Option<i32>,
}

/// Partial update of a department. `Some(None)` clears a reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateDepartmentRequest {
    #[validate(length(
        min = 1,
        max = 250,
        message = "Department name must be between 1 and 250 characters"
    ))]
    pub name:        Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub owner_id:    Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id:   Option<Option<i32>>,
}

/// Employee ids to move into or out of a department
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct DepartmentEmployeesRequest {
    #[validate(length(min = 1, message = "At least one employee is required"))]
    pub employee_ids: Vec<i32>,
}

/// Response for a single department
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentResponse {
    pub id:             i32,
    pub name:           String,
    pub description:    String,
    pub owner_id:       Option<i32>,
    pub parent_id:      Option<i32>,
    /// Number of employees assigned to the department
    pub employee_count: u64,
}

impl DepartmentResponse {
    pub fn from_model(model: departments::Model, employee_count: u64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            owner_id: model.owner_id,
            parent_id: model.parent_id,
            employee_count,
        }
    }
}
