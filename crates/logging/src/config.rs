//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "DIRECTORY_LOG_FORMAT";
/// Environment variable naming the log file.
pub const FILE_ENV: &str = "DIRECTORY_LOG_FILE";
/// Environment variable naming the deployment environment.
pub const ENVIRONMENT_ENV: &str = "DIRECTORY_ENV";

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level or filter directives
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path
    #[serde(default)]
    pub log_file: Option<String>,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "compact".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:       default_level(),
            format:      default_format(),
            log_file:    None,
            environment: default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables, falling back to the given values.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level:       std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
            format:      std::env::var(FORMAT_ENV).unwrap_or_else(|_| format.to_string()),
            log_file:    std::env::var(FILE_ENV)
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var(ENVIRONMENT_ENV).unwrap_or_else(|_| default_environment()),
        }
    }

    /// Build the filter for this configuration.
    ///
    /// Unparseable directives fall back to `info`.
    pub fn filter(&self) -> EnvFilter { EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info")) }

    /// Build the tracing subscriber from this configuration.
    pub fn build(&self) -> Box<dyn tracing::Subscriber + Send + Sync> {
        let timer = fmt::time::UtcTime::new(Rfc3339);
        let file_layer = self.file_appender().map(|appender| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_timer(timer.clone())
                .with_writer(appender)
        });
        let base = Registry::default().with(self.filter()).with(file_layer);

        match self.format.as_str() {
            "pretty" => Box::new(base.with(fmt::layer().pretty().with_timer(timer))),
            "compact" => Box::new(base.with(fmt::layer().compact().with_timer(timer))),
            _ => Box::new(base.with(fmt::layer().json().with_timer(timer))),
        }
    }

    /// Daily rotated appender for the configured log file, if any.
    fn file_appender(&self) -> Option<RollingFileAppender> {
        let path = Path::new(self.log_file.as_deref()?);
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let prefix = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "directory.log".to_string());
        Some(tracing_appender::rolling::daily(directory, prefix))
    }
}
