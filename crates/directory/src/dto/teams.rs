//! # Team Data Transfer Objects
//!
//! Request and response types for team management and membership operations.

use entity::{employees, team_members, teams};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{double_option, ListQuery};

/// Request to create a new team
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(
        min = 1,
        max = 250,
        message = "Team name must be between 1 and 250 characters"
    ))]
    pub name:       String,
    /// Becomes a member with the manager role
    pub manager_id: Option<i32>,
    pub product_id: Option<i32>,
}

/// Request to update an existing team
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(
        min = 1,
        max = 250,
        message = "Team name must be between 1 and 250 characters"
    ))]
    pub name:       Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub manager_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub product_id: Option<Option<i32>>,
}

/// Team list filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TeamListQuery {
    #[serde(flatten)]
    pub list:       ListQuery,
    pub product_id: Option<i32>,
}

/// Request to add employees to a team under one role
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct AddTeamMembersRequest {
    #[validate(length(min = 1, message = "At least one employee is required"))]
    pub employee_ids: Vec<i32>,
    #[validate(length(min = 1, max = 100, message = "Role must be between 1 and 100 characters"))]
    pub role:         String,
}

/// Request to remove employees from a team
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct RemoveTeamMembersRequest {
    #[validate(length(min = 1, message = "At least one employee is required"))]
    pub employee_ids: Vec<i32>,
}

/// Request to update a team member's role
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    #[validate(length(min = 1, max = 100, message = "Role must be between 1 and 100 characters"))]
    pub role: String,
}

/// Response for a single team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamResponse {
    pub id:           i32,
    pub name:         String,
    pub manager_id:   Option<i32>,
    pub product_id:   Option<i32>,
    /// Number of members
    pub member_count: u64,
}

impl TeamResponse {
    pub fn from_model(model: teams::Model, member_count: u64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            manager_id: model.manager_id,
            product_id: model.product_id,
            member_count,
        }
    }
}

/// Response for a team member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMemberResponse {
    pub employee_id: i32,
    pub full_name:   String,
    pub email:       String,
    pub position:    String,
    pub avatar:      Option<String>,
    /// Role in the team
    pub role:        String,
    /// When the employee joined the team (RFC 3339)
    pub joined_at:   String,
}

impl TeamMemberResponse {
    pub fn new(membership: &team_members::Model, employee: &employees::Model) -> Self {
        Self {
            employee_id: employee.id,
            full_name:   employee.full_name.clone(),
            email:       employee.email.clone(),
            position:    employee.position.clone(),
            avatar:      employee.avatar.clone(),
            role:        membership.role.clone(),
            joined_at:   membership.joined_at.to_rfc3339(),
        }
    }
}
