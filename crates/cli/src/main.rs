//! # Directory CLI
//!
//! Command-line interface for the company directory.
//!
//! ## Usage
//!
//! ```bash
//! directory migrate                # Apply database migrations
//! directory dispatch               # Deliver queued emails until interrupted
//! directory reset-password a@b.c   # Issue a new password by email
//! directory --help                 # Show help
//! ```

mod commands;
mod config;

use clap::{CommandFactory as _, Parser};
use commands::Commands;
use config::{DatabaseConfig, MailConfig};
use error::Result;
use logging::LoggingConfig;

/// Company directory tooling
#[derive(Parser, Debug)]
#[command(name = "directory")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level or filter directives (debug, info, directory=debug,sea_orm=warn)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info", global = true)]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(long, env = "DIRECTORY_LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: String,

    /// Also write JSON logs to this file, rotated daily
    #[arg(long, env = "DIRECTORY_LOG_FILE", global = true)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_config = LoggingConfig::from_env(&cli.log_level, &cli.log_format, cli.log_file.as_deref());
    logging::init(&log_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Directory CLI starting...");

    let db_config = DatabaseConfig::from_env()?;
    let mail_config = MailConfig::from_env();

    match cli.command {
        Commands::Migrate(args) => commands::migrate::migrate(&db_config, args).await?,
        Commands::Dispatch(args) => commands::dispatch::dispatch(&db_config, &mail_config, args).await?,
        Commands::ResetPassword(args) => {
            commands::reset_password::reset_password(&db_config, &mail_config, args).await?
        },
        Commands::Completions(args) => commands::completions::completions(args.shell, &mut Cli::command())?,
        Commands::Validate => commands::validate::validate(&db_config, &mail_config).await?,
    }

    logging::info!(target: "app", "Directory CLI completed successfully");
    Ok(())
}
