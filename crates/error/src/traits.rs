//! # Result and Option Extensions
//!
//! Helpers that turn foreign errors and missing rows into [`AppError`]s.

use std::fmt::Display;

use crate::{AppError, Result};

/// Extension methods for results whose error converts into [`AppError`]
pub trait ResultExt<T> {
    /// Convert the error and prefix its message with `context`
    fn context(self, context: impl Display) -> Result<T>;

    /// Convert the error and log it at error level
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Display) -> Result<T> { self.map_err(|e| Into::<AppError>::into(e).context(context)) }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, code = err.code(), "Operation failed");
            err
        })
    }
}

/// Extension methods for lookups that may find nothing
pub trait OptionExt<T> {
    /// `None` becomes NotFound with the message `"{what} not found"`
    fn or_not_found(self, what: impl Display) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, what: impl Display) -> Result<T> {
        self.ok_or_else(|| AppError::not_found(format!("{} not found", what)))
    }
}
