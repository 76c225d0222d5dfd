//! # Company Directory
//!
//! Core services of the company directory: employees and their skills, the
//! department and product trees, teams and their memberships, components,
//! and name/description attachments for any of them.
//!
//! All operations are methods on [`Directory`] and take the acting
//! [`Caller`]; permission checks come first, then validation, then a single
//! transaction. Emails are queued in the outbox and delivered by the
//! [`Dispatcher`](outbox::Dispatcher).

pub mod dto;
pub mod mailer;
pub mod outbox;
pub mod services;
pub mod utils;

use auth::Caller;
use entity::Employees;
use error::{AppError, Result};
use logging::log_security_event;
use sea_orm::{DatabaseConnection, EntityTrait};

pub use mailer::{LogMailer, Mailer, OutgoingEmail};
pub use outbox::{DispatchReport, Dispatcher, DispatcherConfig, Notifier};
pub use services::attachments::{AttachmentKind, AttachmentOwner};

/// Handle to the directory services
#[derive(Debug, Clone)]
pub struct Directory {
    pub db:       DatabaseConnection,
    /// Poked after every commit that queued a notification
    pub notifier: Notifier,
}

impl Directory {
    pub fn new(db: DatabaseConnection) -> Self { Self::with_notifier(db, Notifier::new()) }

    /// Share `notifier` with a [`Dispatcher`] running in the same process
    pub fn with_notifier(db: DatabaseConnection, notifier: Notifier) -> Self { Self { db, notifier } }

    /// Resolve the caller for an authenticated employee id.
    ///
    /// Unknown and fired employees cannot act.
    pub async fn caller(&self, employee_id: i32) -> Result<Caller> {
        let employee = Employees::find_by_id(employee_id).one(&self.db).await?;

        match employee {
            Some(employee) if employee.is_active() => Ok(Caller::new(employee.id, employee.is_superuser)),
            Some(_) => {
                log_security_event!("inactive_caller", employee_id, "fired");
                Err(AppError::unauthorized("Employee is no longer active"))
            },
            None => {
                log_security_event!("unknown_caller", employee_id, "not found");
                Err(AppError::unauthorized("Unknown employee"))
            },
        }
    }
}
