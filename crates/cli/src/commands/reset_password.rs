//! # CLI Reset Password Command

use std::sync::Arc;

use directory::{dto::employees::PasswordResetRequest, Directory, Dispatcher, DispatcherConfig, LogMailer};
use error::Result;
use tracing::info;

use crate::{
    commands::ResetPasswordArgs,
    config::{DatabaseConfig, MailConfig},
};

/// Reset the password and deliver that one email right away; the rest of the
/// outbox stays with `dispatch`
pub async fn reset_password(config: &DatabaseConfig, mail: &MailConfig, args: ResetPasswordArgs) -> Result<()> {
    let db = config.connect().await?;

    let directory = Directory::new(db.clone());
    let outbox_id = directory
        .reset_password(PasswordResetRequest {
            email: args.email.clone(),
        })
        .await?;
    info!(target: "reset_password", email = %args.email, outbox_id, "Password reset queued");

    let dispatcher = Dispatcher::new(
        db,
        Arc::new(LogMailer),
        directory.notifier.clone(),
        DispatcherConfig {
            from: mail.from.clone(),
            ..DispatcherConfig::default()
        },
    );
    let report = dispatcher.deliver_id(outbox_id).await?;
    info!(target: "reset_password", sent = report.sent, "Reset email delivered");
    Ok(())
}
