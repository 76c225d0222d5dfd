//! Simple enum tests for entity crate
//! These tests cover the string representations that end up in the database.

use entity::sea_orm_active_enums::{EmployeeStatus, EmploymentType, Grade, OutboxStatus, OwnerKind};
use sea_orm::{ActiveEnum, Iterable};

/// Test EmployeeStatus enum values
#[test]
fn test_employee_status_values() {
    assert_eq!(format!("{}", EmployeeStatus::Working), "working");
    assert_eq!(format!("{}", EmployeeStatus::Vacation), "vacation");
    assert_eq!(format!("{}", EmployeeStatus::Sick), "sick");
    assert_eq!(format!("{}", EmployeeStatus::Fired), "fired");
}

/// Display and stored value agree for every status
#[test]
fn test_employee_status_display_matches_db_value() {
    for status in EmployeeStatus::iter() {
        assert_eq!(status.to_string(), status.to_value());
    }
}

/// Test EmploymentType enum values
#[test]
fn test_employment_type_values() {
    assert_eq!(EmploymentType::FullTime.to_value(), "full_time");
    assert_eq!(EmploymentType::PartTime.to_value(), "part_time");
    assert_eq!(EmploymentType::Internship.to_value(), "internship");
}

/// Grades are stored as their level and labelled Gr-N
#[test]
fn test_grade_levels_and_labels() {
    let levels: Vec<u8> = Grade::iter().map(Grade::level).collect();
    assert_eq!(levels, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(Grade::G3.to_value(), "3");
    assert_eq!(Grade::G3.label(), "Gr-3");
    assert_eq!(Grade::try_from_value(&"7".to_string()).unwrap(), Grade::G7);
    assert!(Grade::try_from_value(&"8".to_string()).is_err());
}

/// Grades deserialize from their stored string
#[test]
fn test_grade_serde() {
    let grade: Grade = serde_json::from_str("\"5\"").unwrap();
    assert_eq!(grade, Grade::G5);
    assert_eq!(serde_json::to_string(&Grade::G1).unwrap(), "\"1\"");
}

/// Test OwnerKind enum values
#[test]
fn test_owner_kind_values() {
    let kinds: Vec<String> = OwnerKind::iter().map(|k| k.to_string()).collect();
    assert_eq!(
        kinds,
        vec!["department", "product", "team", "component", "employee"]
    );
}

/// Test OutboxStatus equality
#[test]
fn test_outbox_status_equality() {
    assert_eq!(OutboxStatus::Pending, OutboxStatus::Pending);
    assert_ne!(OutboxStatus::Pending, OutboxStatus::Sent);
    assert_eq!(OutboxStatus::Failed.to_string(), "failed");
}
