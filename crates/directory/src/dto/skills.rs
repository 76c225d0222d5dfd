//! # Skill Data Transfer Objects

use serde::Deserialize;
use validator::Validate;

/// Request to add a skill to the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateSkillRequest {
    #[validate(length(min = 1, max = 100, message = "Skill name must be between 1 and 100 characters"))]
    pub name: String,
}

/// Replace the skill set of an employee
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SetSkillsRequest {
    pub skill_ids: Vec<i32>,
}
