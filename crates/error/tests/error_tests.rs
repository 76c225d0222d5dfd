//! # Error Crate Tests
//!
//! Tests for error construction, serialization of field errors and conversions.

#[cfg(test)]
mod error_construction_tests {
    use error::AppError;

    #[test]
    fn test_error_creation() {
        let error = AppError::not_found("Employee 12 not found");
        assert!(matches!(error, AppError::NotFound { .. }));
    }

    #[test]
    fn test_error_message() {
        let error = AppError::bad_request("Invalid input");
        assert_eq!(error.message(), "Invalid input");
        assert_eq!(format!("{}", error), "BadRequest: Invalid input");
    }

    #[test]
    fn test_permission_errors() {
        assert_eq!(AppError::forbidden("x").status(), http::StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::unauthorized("x").status(),
            http::StatusCode::UNAUTHORIZED
        );
    }
}

#[cfg(test)]
mod field_error_tests {
    use error::{AppError, FieldError};
    use serde_json::json;

    #[test]
    fn test_field_error_serializes() {
        let value = serde_json::to_value(FieldError::new("email", "already registered")).unwrap();
        assert_eq!(value, json!({"field": "email", "message": "already registered"}));
    }

    #[test]
    fn test_field_errors_are_preserved() {
        let err = AppError::fields(vec![
            FieldError::new("telephone", "must start with +"),
            FieldError::new("birth_date", "cannot be in the future"),
        ]);

        let names: Vec<&str> = err.field_errors().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["telephone", "birth_date"]);
        assert!(err.is_validation());
    }
}

#[cfg(test)]
mod conversion_tests {
    use error::{AppError, OptionExt, ResultExt};

    #[test]
    fn test_io_conversion_with_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.context("Opening log file").unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
        assert_eq!(err.message(), "Opening log file: denied");
    }

    #[test]
    fn test_log_error_passes_error_through() {
        let result: Result<(), AppError> = Err(AppError::conflict("Team name taken"));
        let err = result.log_error().unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_missing_row_becomes_not_found() {
        let row: Option<&str> = None;
        let err = row.or_not_found("Employee 12").unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.message(), "Employee 12 not found");
    }
}
