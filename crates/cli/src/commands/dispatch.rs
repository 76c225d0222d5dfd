//! # CLI Dispatch Command
//!
//! Drains the notification outbox through the log mailer, either once or
//! until interrupted.

use std::{sync::Arc, time::Duration};

use directory::{Dispatcher, DispatcherConfig, LogMailer, Notifier};
use error::Result;
use tracing::info;

use crate::{
    commands::DispatchArgs,
    config::{DatabaseConfig, MailConfig},
};

pub fn dispatcher_config(mail: &MailConfig, args: &DispatchArgs) -> DispatcherConfig {
    DispatcherConfig {
        from: mail.from.clone(),
        max_attempts: args.max_attempts.max(1),
        poll_interval: Duration::from_secs(args.poll_interval_secs.max(1)),
        ..DispatcherConfig::default()
    }
}

pub async fn dispatch(config: &DatabaseConfig, mail: &MailConfig, args: DispatchArgs) -> Result<()> {
    let db = config.connect().await?;

    let dispatcher = Dispatcher::new(
        db,
        Arc::new(LogMailer),
        Notifier::new(),
        dispatcher_config(mail, &args),
    );

    if args.once {
        let report = dispatcher.run_pending().await?;
        info!(
            target: "dispatch",
            sent = report.sent,
            retried = report.retried,
            failed = report.failed,
            "Outbox drained"
        );
        return Ok(());
    }

    dispatcher
        .run(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!(target: "dispatch", "Shutdown signal received");
            }
        })
        .await
}
