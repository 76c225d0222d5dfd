//! # CLI Commands
//!
//! Implementation of the `directory` subcommands.

pub mod completions;
pub mod dispatch;
pub mod migrate;
pub mod reset_password;
pub mod validate;

use clap::{Args, Subcommand};

/// Available commands for the directory CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate(MigrateArgs),

    /// Deliver queued notification emails
    Dispatch(DispatchArgs),

    /// Issue a new password for an employee and email it
    ResetPassword(ResetPasswordArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration and database connectivity
    Validate,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Rollback the last migration
    #[arg(long, conflicts_with = "dry_run")]
    pub rollback: bool,
}

/// Arguments for the dispatch command
#[derive(Args, Debug)]
pub struct DispatchArgs {
    /// Deliver what is pending now and exit
    #[arg(long)]
    pub once: bool,

    /// Seconds between outbox polls when running continuously
    #[arg(long, env = "DIRECTORY_DISPATCH_POLL_SECS", default_value = "30")]
    pub poll_interval_secs: u64,

    /// Attempts before a notification is marked failed
    #[arg(long, env = "DIRECTORY_DISPATCH_MAX_ATTEMPTS", default_value = "5")]
    pub max_attempts: i32,
}

/// Arguments for the reset-password command
#[derive(Args, Debug)]
pub struct ResetPasswordArgs {
    /// Login email of the employee
    pub email: String,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
