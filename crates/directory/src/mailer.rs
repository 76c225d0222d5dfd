//! # Mail Delivery
//!
//! The directory never talks SMTP itself. Outbox rows are handed to a [`Mailer`]
//! by the [`Dispatcher`](crate::outbox::Dispatcher).

use async_trait::async_trait;
use error::Result;
use serde::Serialize;
use tracing::info;

/// A fully rendered email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from:    String,
    pub to:      Vec<String>,
    pub subject: String,
    pub body:    String,
}

/// Delivery backend for outgoing email
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one email. An error leaves the outbox row pending for a retry.
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// Mailer that only writes a log line per email.
///
/// Used by the CLI when no real transport is configured. The body is not
/// logged since reset emails carry a password.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        info!(
            target: "mailer",
            from = %email.from,
            to = ?email.to,
            subject = %email.subject,
            body_len = email.body.len(),
            "Email delivered"
        );
        Ok(())
    }
}
