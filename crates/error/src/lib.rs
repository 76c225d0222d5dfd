//! # Directory Error Infrastructure
//!
//! Error types shared by the directory services, the migration runner and the CLI.

pub mod traits;

use serde::Serialize;
pub use traits::{OptionExt, ResultExt};

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// A validation failure attached to a single input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field
    pub field:   String,
    /// Human readable description of the problem
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    #[inline]
    pub fn new(field: impl ToString, message: impl ToString) -> Self {
        Self {
            field:   field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}: {}", self.field, self.message) }
}

/// Main application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("BadRequest: {message}")]
    BadRequest {
        message: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    #[error("Validation: {message}")]
    Validation {
        message: String,
    },

    #[error("Validation: {}", join_fields(.fields))]
    InvalidFields {
        fields: Vec<FieldError>,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("IO: {message}")]
    Io {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },

    #[error("Migration: {message}")]
    Migration {
        message: String,
    },
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self {
        Self::NotFound {
            message: resource.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create a forbidden error.
    #[inline]
    pub fn forbidden(message: impl ToString) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    /// Create a conflict error.
    #[inline]
    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict {
            message: message.to_string(),
        }
    }

    /// Create a general validation error.
    #[inline]
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create a validation error for a single field.
    #[inline]
    pub fn field(field: impl ToString, message: impl ToString) -> Self {
        Self::InvalidFields {
            fields: vec![FieldError::new(field, message)],
        }
    }

    /// Create a validation error from a list of field errors.
    #[inline]
    pub fn fields(fields: Vec<FieldError>) -> Self {
        Self::InvalidFields {
            fields,
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a migration error.
    #[inline]
    pub fn migration(message: impl ToString) -> Self {
        Self::Migration {
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> http::StatusCode {
        match self {
            AppError::NotFound {
                ..
            } => http::StatusCode::NOT_FOUND,
            AppError::BadRequest {
                ..
            } => http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized {
                ..
            } => http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden {
                ..
            } => http::StatusCode::FORBIDDEN,
            AppError::Conflict {
                ..
            } => http::StatusCode::CONFLICT,
            AppError::Validation {
                ..
            }
            | AppError::InvalidFields {
                ..
            } => http::StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal {
                ..
            }
            | AppError::Database {
                ..
            }
            | AppError::Io {
                ..
            }
            | AppError::Config {
                ..
            }
            | AppError::Migration {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound {
                ..
            } => "NOT_FOUND",
            AppError::BadRequest {
                ..
            } => "BAD_REQUEST",
            AppError::Unauthorized {
                ..
            } => "UNAUTHORIZED",
            AppError::Forbidden {
                ..
            } => "FORBIDDEN",
            AppError::Conflict {
                ..
            } => "CONFLICT",
            AppError::Validation {
                ..
            }
            | AppError::InvalidFields {
                ..
            } => "VALIDATION_ERROR",
            AppError::Internal {
                ..
            } => "INTERNAL_ERROR",
            AppError::Database {
                ..
            } => "DATABASE_ERROR",
            AppError::Io {
                ..
            } => "IO_ERROR",
            AppError::Config {
                ..
            } => "CONFIG_ERROR",
            AppError::Migration {
                ..
            } => "MIGRATION_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidFields {
                fields,
            } => join_fields(fields),
            AppError::NotFound {
                message,
            }
            | AppError::BadRequest {
                message,
            }
            | AppError::Unauthorized {
                message,
            }
            | AppError::Forbidden {
                message,
            }
            | AppError::Conflict {
                message,
            }
            | AppError::Validation {
                message,
            }
            | AppError::Internal {
                message,
            }
            | AppError::Database {
                message,
            }
            | AppError::Io {
                message,
            }
            | AppError::Config {
                message,
            }
            | AppError::Migration {
                message,
            } => message.clone(),
        }
    }

    /// Per-field errors, empty for every variant but `InvalidFields`.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AppError::InvalidFields {
                fields,
            } => fields,
            _ => &[],
        }
    }

    /// Whether the error is client-correctable input.
    pub fn is_validation(&self) -> bool { self.code() == "VALIDATION_ERROR" }

    /// Add context to the error.
    #[inline]
    pub fn context(self, context: impl ToString) -> Self {
        let context_msg = context.to_string();
        match self {
            AppError::NotFound {
                message,
            } => {
                Self::NotFound {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::BadRequest {
                message,
            } => {
                Self::BadRequest {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::Unauthorized {
                message,
            } => {
                Self::Unauthorized {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::Forbidden {
                message,
            } => {
                Self::Forbidden {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::Conflict {
                message,
            } => {
                Self::Conflict {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::Validation {
                message,
            } => {
                Self::Validation {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::InvalidFields {
                ..
            } => self,
            AppError::Internal {
                message,
            } => {
                Self::Internal {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::Database {
                message,
            } => {
                Self::Database {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::Io {
                message,
            } => {
                Self::Io {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::Config {
                message,
            } => {
                Self::Config {
                    message: format!("{}: {}", context_msg, message),
                }
            },
            AppError::Migration {
                message,
            } => {
                Self::Migration {
                    message: format!("{}: {}", context_msg, message),
                }
            },
        }
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert String to AppError.
impl From<String> for AppError {
    fn from(s: String) -> Self {
        Self::BadRequest {
            message: s,
        }
    }
}

/// Convert &str to AppError.
impl From<&str> for AppError {
    fn from(s: &str) -> Self { Self::from(s.to_string()) }
}

/// Convert Sea-ORM database errors to AppError.
///
/// Integrity violations raised by the store become `Conflict`.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                Self::Conflict {
                    message: format!("Unique constraint violated: {}", detail),
                }
            },
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(detail)) => {
                Self::Conflict {
                    message: format!("Referenced row is still in use: {}", detail),
                }
            },
            _ => {
                Self::Database {
                    message: err.to_string(),
                }
            },
        }
    }
}

/// Convert sea-orm transaction errors to AppError.
impl From<sea_orm::TransactionError<AppError>> for AppError {
    fn from(err: sea_orm::TransactionError<AppError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db_err) => db_err.into(),
            sea_orm::TransactionError::Transaction(app_err) => app_err,
        }
    }
}

/// Convert validator validation errors to AppError.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string());
                    FieldError::new(field, message)
                })
            })
            .collect();

        if fields.is_empty() {
            return Self::Validation {
                message: "Validation failed".to_string(),
            };
        }

        // field_errors() iterates a HashMap
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self::InvalidFields {
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_not_found() {
        let err = AppError::not_found("Team");
        assert_eq!(err.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.to_string().contains("NotFound"));
    }

    #[test]
    fn test_error_conflict() {
        let err = AppError::conflict("Duplicate entry");
        assert_eq!(err.status(), http::StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_error_validation() {
        let err = AppError::validation("Invalid format");
        assert_eq!(err.status(), http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.is_validation());
        assert!(err.field_errors().is_empty());
    }

    #[test]
    fn test_error_field() {
        let err = AppError::field("parent_id", "A department cannot be its own parent");
        assert_eq!(err.status(), http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "parent_id");
        assert_eq!(
            err.message(),
            "parent_id: A department cannot be its own parent"
        );
    }

    #[test]
    fn test_error_fields_join() {
        let err = AppError::fields(vec![
            FieldError::new("phone", "bad"),
            FieldError::new("email", "taken"),
        ]);
        assert_eq!(err.to_string(), "Validation: phone: bad; email: taken");
    }

    #[test]
    fn test_error_internal_family() {
        for err in [
            AppError::internal("x"),
            AppError::database("x"),
            AppError::config("x"),
            AppError::migration("x"),
            AppError::Io {
                message: "x".to_string(),
            },
        ] {
            assert_eq!(err.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_error_context_not_found() {
        let err = AppError::not_found("Team").context("Fetching team");
        assert_eq!(err.message(), "Fetching team: Team");
    }

    #[test]
    fn test_error_context_keeps_fields() {
        let err = AppError::field("email", "taken").context("Creating employee");
        assert_eq!(err.field_errors().len(), 1);
    }

    #[test]
    fn test_from_anyhow() {
        let err: AppError = anyhow::anyhow!("Test error").into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_from_str() {
        let err: AppError = "Bad request".into();
        assert_eq!(err.code(), "BAD_REQUEST");
    }

    #[test]
    fn test_from_plain_db_err() {
        let err: AppError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_from_transaction_error() {
        let err: AppError = sea_orm::TransactionError::Transaction(AppError::conflict("taken")).into();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct TestStruct {
            #[validate(length(min = 3, message = "Role is too short"))]
            role: String,
        }

        let s = TestStruct {
            role: "x".to_string(),
        };
        let app_error: AppError = s.validate().unwrap_err().into();

        match app_error {
            AppError::InvalidFields {
                fields,
            } => {
                assert_eq!(fields, vec![FieldError::new("role", "Role is too short")]);
            },
            other => panic!("Expected InvalidFields error, got {:?}", other),
        }
    }
}
