//! # Employee Data Transfer Objects
//!
//! Request and response types for employee records, the caller's own profile
//! and password reset.

use chrono::NaiveDate;
use entity::{
    employees,
    sea_orm_active_enums::{EmployeeStatus, EmploymentType, Grade},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{double_option, ListQuery};

/// Request to create an employee
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 250, message = "Full name must be between 1 and 250 characters"))]
    pub full_name:       String,
    #[validate(email(message = "Invalid email address"))]
    pub email:           String,
    #[validate(length(min = 1, max = 250, message = "Position must be between 1 and 250 characters"))]
    pub position:        String,
    pub birth_date:      NaiveDate,
    pub hire_date:       Option<NaiveDate>,
    #[validate(length(min = 1, max = 50, message = "Telegram must be between 1 and 50 characters"))]
    pub telegram:        Option<String>,
    pub telephone:       String,
    pub employment_type: EmploymentType,
    #[serde(default = "default_status")]
    pub status:          EmployeeStatus,
    #[validate(length(min = 1, max = 300, message = "Location must be between 1 and 300 characters"))]
    pub location:        String,
    pub grade:           Option<Grade>,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Bio must not exceed 5000 characters"))]
    pub bio:             String,
    #[serde(default)]
    pub is_outsource:    bool,
    #[serde(default)]
    pub is_superuser:    bool,
    pub department_id:   Option<i32>,
    #[serde(default)]
    pub skill_ids:       Vec<i32>,
}

fn default_status() -> EmployeeStatus { EmployeeStatus::Working }

/// Partial update of an employee.
///
/// An employee editing their own record may only touch `telegram`,
/// `telephone`, `status`, `location`, `skill_ids` and `bio`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 250, message = "Full name must be between 1 and 250 characters"))]
    pub full_name:       Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email:           Option<String>,
    #[validate(length(min = 1, max = 250, message = "Position must be between 1 and 250 characters"))]
    pub position:        Option<String>,
    pub birth_date:      Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub hire_date:       Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub telegram:        Option<Option<String>>,
    pub telephone:       Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub status:          Option<EmployeeStatus>,
    #[validate(length(min = 1, max = 300, message = "Location must be between 1 and 300 characters"))]
    pub location:        Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub grade:           Option<Option<Grade>>,
    #[validate(length(max = 5000, message = "Bio must not exceed 5000 characters"))]
    pub bio:             Option<String>,
    pub is_outsource:    Option<bool>,
    pub is_superuser:    Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub department_id:   Option<Option<i32>>,
    /// Replaces the skill set
    pub skill_ids:       Option<Vec<i32>>,
}

impl UpdateEmployeeRequest {
    /// Names of the set fields an employee may not change on their own record
    pub fn restricted_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.full_name.is_some() {
            fields.push("full_name");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.position.is_some() {
            fields.push("position");
        }
        if self.birth_date.is_some() {
            fields.push("birth_date");
        }
        if self.hire_date.is_some() {
            fields.push("hire_date");
        }
        if self.employment_type.is_some() {
            fields.push("employment_type");
        }
        if self.grade.is_some() {
            fields.push("grade");
        }
        if self.is_outsource.is_some() {
            fields.push("is_outsource");
        }
        if self.is_superuser.is_some() {
            fields.push("is_superuser");
        }
        if self.department_id.is_some() {
            fields.push("department_id");
        }
        fields
    }
}

/// Employee list filters. Text filters match exactly, `search` is a substring match
/// over full name, position and email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmployeeListQuery {
    #[serde(flatten)]
    pub list:            ListQuery,
    pub position:        Option<String>,
    /// Department name
    pub department:      Option<String>,
    pub grade:           Option<Grade>,
    pub employment_type: Option<EmploymentType>,
    /// Matches employees having any of these skill names
    #[serde(default)]
    pub skills:          Vec<String>,
    pub is_outsource:    Option<bool>,
    pub location:        Option<String>,
    /// Team name
    pub team:            Option<String>,
    /// Product name, through the employee's teams
    pub product:         Option<String>,
    pub status:          Option<EmployeeStatus>,
}

/// Avatar storage reference
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct SetAvatarRequest {
    #[validate(length(min = 1, max = 500, message = "Avatar reference must be between 1 and 500 characters"))]
    pub avatar: String,
}

/// Password reset request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Short employee card used in membership listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSummary {
    pub id:        i32,
    pub full_name: String,
    pub position:  String,
    pub avatar:    Option<String>,
    pub grade:     Option<Grade>,
    pub status:    EmployeeStatus,
}

impl From<employees::Model> for EmployeeSummary {
    fn from(model: employees::Model) -> Self {
        Self {
            id:        model.id,
            full_name: model.full_name,
            position:  model.position,
            avatar:    model.avatar,
            grade:     model.grade,
            status:    model.status,
        }
    }
}

/// Full employee record with skill names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeResponse {
    #[serde(flatten)]
    pub employee: employees::Model,
    pub skills:   Vec<String>,
}
