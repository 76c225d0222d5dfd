//! String-backed enumerations shared by several entities.
//!
//! All of them are stored as plain string columns so the same schema works on
//! SQLite and PostgreSQL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employment type of an employee
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    #[sea_orm(string_value = "full_time")]
    FullTime,
    #[sea_orm(string_value = "part_time")]
    PartTime,
    #[sea_orm(string_value = "internship")]
    Internship,
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmploymentType::FullTime => write!(f, "full_time"),
            EmploymentType::PartTime => write!(f, "part_time"),
            EmploymentType::Internship => write!(f, "internship"),
        }
    }
}

/// Working status of an employee
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// At work
    #[sea_orm(string_value = "working")]
    Working,
    #[sea_orm(string_value = "vacation")]
    Vacation,
    #[sea_orm(string_value = "sick")]
    Sick,
    /// Terminal state set by the ordinary delete operation
    #[sea_orm(string_value = "fired")]
    Fired,
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeStatus::Working => write!(f, "working"),
            EmployeeStatus::Vacation => write!(f, "vacation"),
            EmployeeStatus::Sick => write!(f, "sick"),
            EmployeeStatus::Fired => write!(f, "fired"),
        }
    }
}

/// Seven-level employee grade, stored as "1" through "7"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum Grade {
    #[sea_orm(string_value = "1")]
    #[serde(rename = "1")]
    G1,
    #[sea_orm(string_value = "2")]
    #[serde(rename = "2")]
    G2,
    #[sea_orm(string_value = "3")]
    #[serde(rename = "3")]
    G3,
    #[sea_orm(string_value = "4")]
    #[serde(rename = "4")]
    G4,
    #[sea_orm(string_value = "5")]
    #[serde(rename = "5")]
    G5,
    #[sea_orm(string_value = "6")]
    #[serde(rename = "6")]
    G6,
    #[sea_orm(string_value = "7")]
    #[serde(rename = "7")]
    G7,
}

impl Grade {
    /// Numeric level, 1 to 7
    pub fn level(self) -> u8 {
        match self {
            Grade::G1 => 1,
            Grade::G2 => 2,
            Grade::G3 => 3,
            Grade::G4 => 4,
            Grade::G5 => 5,
            Grade::G6 => 6,
            Grade::G7 => 7,
        }
    }

    /// Display label used by the HR tooling, e.g. `Gr-3`
    pub fn label(self) -> String { format!("Gr-{}", self.level()) }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.level()) }
}

/// Entity kinds that can own additional fields and metrics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    #[sea_orm(string_value = "department")]
    Department,
    #[sea_orm(string_value = "product")]
    Product,
    #[sea_orm(string_value = "team")]
    Team,
    #[sea_orm(string_value = "component")]
    Component,
    #[sea_orm(string_value = "employee")]
    Employee,
}

impl std::fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnerKind::Department => write!(f, "department"),
            OwnerKind::Product => write!(f, "product"),
            OwnerKind::Team => write!(f, "team"),
            OwnerKind::Component => write!(f, "component"),
            OwnerKind::Employee => write!(f, "employee"),
        }
    }
}

/// Delivery state of an outbox notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    /// Waiting for the dispatcher
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Gave up after the configured number of attempts
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl std::fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutboxStatus::Pending => write!(f, "pending"),
            OutboxStatus::Sent => write!(f, "sent"),
            OutboxStatus::Failed => write!(f, "failed"),
        }
    }
}
