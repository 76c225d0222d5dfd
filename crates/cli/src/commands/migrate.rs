//! # CLI Migration Command
//!
//! Applies pending schema migrations, lists them, or rolls back the newest one.

use error::{Result, ResultExt};
use migration::{DatabaseConnection, Migrator, MigratorTrait as _};
use tracing::{info, Instrument as _};

use crate::{commands::MigrateArgs, config::DatabaseConfig};

/// What a `migrate` invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationPlan {
    Apply,
    DryRun,
    RollbackLast,
}

impl From<&MigrateArgs> for MigrationPlan {
    fn from(args: &MigrateArgs) -> Self {
        if args.rollback {
            Self::RollbackLast
        }
        else if args.dry_run {
            Self::DryRun
        }
        else {
            Self::Apply
        }
    }
}

pub async fn migrate(config: &DatabaseConfig, args: MigrateArgs) -> Result<()> {
    let plan = MigrationPlan::from(&args);
    info!(target: "migrate", ?plan, "Running database migrations");

    let db = config.connect().await?;
    run_plan(&db, plan).await
}

/// Execute `plan` against an open connection
pub async fn run_plan(db: &DatabaseConnection, plan: MigrationPlan) -> Result<()> {
    match plan {
        MigrationPlan::DryRun => {
            let pending = Migrator::get_pending_migrations(db)
                .await
                .context("Listing pending migrations")?;
            info!(target: "migrate", pending = pending.len(), "Pending migrations");
            for pending_migration in &pending {
                info!(target: "migrate", name = %pending_migration.name(), "Would apply");
            }
        },
        MigrationPlan::RollbackLast => {
            Migrator::down(db, Some(1))
                .instrument(logging::operation_span!("migrate", "down", steps = 1))
                .await
                .context("Rolling back the last migration")?;
            info!(target: "migrate", "Rolled back the last migration");
        },
        MigrationPlan::Apply => {
            Migrator::up(db, None)
                .instrument(logging::operation_span!("migrate", "up"))
                .await
                .context("Applying migrations")?;
            info!(target: "migrate", "Schema is up to date");
        },
    }
    Ok(())
}
