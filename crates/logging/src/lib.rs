//! # Directory Logging
//!
//! Subscriber setup for the `directory` binary and the event macros the
//! services log through. Events carry a fixed `target` (`membership`,
//! `database`, `security`, `dispatch`, `migrate` and so on) so a deployment can raise one
//! area to `debug` with `RUST_LOG=security=debug` without drowning in the rest.

pub mod config;
pub mod macros;

pub use config::LoggingConfig;
pub use tracing::{self, info};

/// Install `config` as the global subscriber.
///
/// Fails when a subscriber is already installed; the CLI calls this once
/// before dispatching a command.
pub fn init(config: &LoggingConfig) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(config.build())?;
    info!(
        target: "app",
        filter = %config.filter(),
        format = %config.format,
        environment = %config.environment,
        log_file = ?config.log_file,
        "Logging initialized"
    );
    Ok(())
}
