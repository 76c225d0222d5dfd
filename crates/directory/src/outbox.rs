//! # Notification Outbox
//!
//! Services write notifications into `notification_outbox` inside the same
//! transaction as the change that caused them, then poke the [`Notifier`]
//! after commit. The [`Dispatcher`] drains pending rows through a [`Mailer`].
//! Delivery failures are recorded on the row and never reach the caller of the
//! original operation.

use std::{future::Future, sync::Arc, time::Duration};

use chrono::Utc;
use entity::{
    notification_outbox::{self, Column as OutboxColumn},
    sea_orm_active_enums::OutboxStatus,
    NotificationOutbox,
};
use error::Result;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::mailer::{Mailer, OutgoingEmail};

/// Wakes the dispatcher when new rows were committed
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    inner: Arc<Notify>,
}

impl Notifier {
    pub fn new() -> Self { Self::default() }

    /// Signal that the outbox has new work. A signal sent while the dispatcher
    /// is busy is kept until its next wait.
    pub fn notify(&self) { self.inner.notify_one(); }

    pub async fn notified(&self) { self.inner.notified().await }
}

/// Queue an email in the outbox. Returns `None` when there is nobody to send to.
pub async fn enqueue<C: ConnectionTrait>(
    db: &C,
    subject: impl Into<String>,
    body: impl Into<String>,
    recipients: Vec<String>,
) -> Result<Option<i32>> {
    if recipients.is_empty() {
        return Ok(None);
    }

    let row = notification_outbox::ActiveModel {
        subject: Set(subject.into()),
        body: Set(body.into()),
        recipients: Set(serde_json::json!(recipients)),
        status: Set(OutboxStatus::Pending),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(Utc::now()),
        sent_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(outbox_id = row.id, recipients = recipients.len(), "Notification queued");
    Ok(Some(row.id))
}

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Sender address for every email
    pub from:          String,
    /// Attempts before a row is marked failed
    pub max_attempts:  i32,
    /// Wake-up interval when no notification arrives
    pub poll_interval: Duration,
    /// Rows fetched per query
    pub batch_size:    u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            from:          "noreply@directory.local".to_string(),
            max_attempts:  5,
            poll_interval: Duration::from_secs(30),
            batch_size:    50,
        }
    }
}

/// Outcome of one pass over the outbox
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent:    u64,
    /// Failed this pass but will be retried
    pub retried: u64,
    /// Gave up on these
    pub failed:  u64,
}

/// Delivers pending outbox rows
pub struct Dispatcher {
    db:       DatabaseConnection,
    mailer:   Arc<dyn Mailer>,
    notifier: Notifier,
    config:   DispatcherConfig,
}

impl Dispatcher {
    pub fn new(db: DatabaseConnection, mailer: Arc<dyn Mailer>, notifier: Notifier, config: DispatcherConfig) -> Self {
        Self {
            db,
            mailer,
            notifier,
            config,
        }
    }

    /// Deliver every row that is pending at the start of the pass.
    ///
    /// Each row is attempted at most once per pass.
    pub async fn run_pending(&self) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();
        let mut last_id = 0;

        loop {
            let batch = NotificationOutbox::find()
                .filter(OutboxColumn::Status.eq(OutboxStatus::Pending))
                .filter(OutboxColumn::Id.gt(last_id))
                .order_by_asc(OutboxColumn::Id)
                .limit(self.config.batch_size)
                .all(&self.db)
                .await?;

            let Some(last) = batch.last()
            else {
                break;
            };
            last_id = last.id;

            for row in batch {
                self.deliver(row, &mut report).await?;
            }
        }

        if report != DispatchReport::default() {
            info!(
                sent = report.sent,
                retried = report.retried,
                failed = report.failed,
                "Outbox pass completed"
            );
        }
        Ok(report)
    }

    /// Deliver the single row `outbox_id` if it is still pending.
    ///
    /// Other pending rows are left for the next pass.
    pub async fn deliver_id(&self, outbox_id: i32) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();
        let row = NotificationOutbox::find_by_id(outbox_id)
            .filter(OutboxColumn::Status.eq(OutboxStatus::Pending))
            .one(&self.db)
            .await?;

        match row {
            Some(row) => self.deliver(row, &mut report).await?,
            None => debug!(outbox_id, "Nothing pending under this id"),
        }
        Ok(report)
    }

    async fn deliver(&self, row: notification_outbox::Model, report: &mut DispatchReport) -> Result<()> {
        let email = OutgoingEmail {
            from:    self.config.from.clone(),
            to:      row.recipient_list(),
            subject: row.subject.clone(),
            body:    row.body.clone(),
        };
        let attempts = row.attempts + 1;
        let outbox_id = row.id;
        let mut active: notification_outbox::ActiveModel = row.into();
        active.attempts = Set(attempts);

        match self.mailer.send(&email).await {
            Ok(()) => {
                active.status = Set(OutboxStatus::Sent);
                active.sent_at = Set(Some(Utc::now()));
                active.last_error = Set(None);
                report.sent += 1;
            },
            Err(err) => {
                let exhausted = attempts >= self.config.max_attempts;
                if exhausted {
                    error!(outbox_id, attempts, error = %err, "Giving up on notification");
                    active.status = Set(OutboxStatus::Failed);
                    report.failed += 1;
                }
                else {
                    warn!(outbox_id, attempts, error = %err, "Notification delivery failed, will retry");
                    report.retried += 1;
                }
                active.last_error = Set(Some(err.to_string()));
            },
        }

        active.update(&self.db).await?;
        Ok(())
    }

    /// Run until `shutdown` resolves, waking on notifications or the poll interval.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            max_attempts = self.config.max_attempts,
            "Outbox dispatcher started"
        );

        loop {
            if let Err(err) = logging::measure_duration!("outbox", "run_pending", { self.run_pending().await }) {
                error!(error = %err, "Outbox pass failed");
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.notifier.notified() => {},
                _ = tokio::time::sleep(self.config.poll_interval) => {},
            }
        }

        info!("Outbox dispatcher stopped");
        Ok(())
    }
}
