//! # CLI Configuration
//!
//! Database and mail settings read from the environment. A `.env` file is
//! loaded by `main` before anything here runs.

use error::{AppError, Result, ResultExt};
use migration::DatabaseConnection;

pub const DATABASE_URL_ENV: &str = "DIRECTORY_DATABASE_URL";
pub const MAIL_FROM_ENV: &str = "DIRECTORY_MAIL_FROM";
pub const DEFAULT_MAIL_FROM: &str = "noreply@directory.local";

/// Database configuration for CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts
    pub url:       Option<String>,
    pub host:      String,
    pub port:      u16,
    pub database:  String,
    pub username:  String,
    pub password:  String,
    pub ssl_mode:  String,
    /// Connection pool size
    pub pool_size: u32,
}

/// Errors that can occur when parsing database configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DatabaseConfigError {
    /// The port number could not be parsed as a valid number.
    #[error("Invalid port number: {value}")]
    InvalidPort {
        /// The invalid port value that was provided.
        value: String,
    },
    #[error("Invalid pool size: {value}")]
    InvalidPoolSize { value: String },
}

impl From<DatabaseConfigError> for AppError {
    fn from(err: DatabaseConfigError) -> Self { AppError::config(err.to_string()) }
}

impl DatabaseConfig {
    /// Creates a new DatabaseConfig from environment variables.
    pub fn from_env() -> Result<Self, DatabaseConfigError> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DatabaseConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let port_str = var("DIRECTORY_DATABASE_PORT", "5432");
        let port = port_str.parse::<u16>().map_err(|_e| {
            DatabaseConfigError::InvalidPort {
                value: port_str.clone(),
            }
        })?;

        let pool_str = var("DIRECTORY_DATABASE_POOL_SIZE", "10");
        let pool_size = pool_str
            .parse::<u32>()
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| {
                DatabaseConfigError::InvalidPoolSize {
                    value: pool_str.clone(),
                }
            })?;

        Ok(Self {
            url: lookup(DATABASE_URL_ENV).filter(|url| !url.trim().is_empty()),
            host: var("DIRECTORY_DATABASE_HOST", "localhost"),
            port,
            database: var("DIRECTORY_DATABASE_NAME", "directory"),
            username: var("DIRECTORY_DATABASE_USER", "directory"),
            password: var("DIRECTORY_DATABASE_PASSWORD", ""),
            ssl_mode: var("DIRECTORY_DATABASE_SSL_MODE", "prefer"),
            pool_size,
        })
    }

    /// The explicit URL, or a PostgreSQL URL assembled from the parts
    pub fn database_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => build_database_url(self),
        }
    }

    /// Open a connection pool of `pool_size` connections
    pub async fn connect(&self) -> Result<DatabaseConnection> {
        migration::connect_to_database(&self.database_url(), self.pool_size)
            .await
            .context("Failed to connect to database")
    }
}

/// Builds a PostgreSQL connection URL from the individual settings
pub fn build_database_url(config: &DatabaseConfig) -> String {
    let encoded_username = percent_encode_userinfo(&config.username);
    let encoded_password = percent_encode_userinfo(&config.password);
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        encoded_username, encoded_password, config.host, config.port, config.database, config.ssl_mode
    )
}

/// Percent-encode everything but unreserved characters, byte by byte
fn percent_encode_userinfo(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut result = String::with_capacity(s.len().saturating_mul(3));
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            result.push(char::from(byte));
        }
        else {
            result.push('%');
            result.push(char::from(HEX[usize::from(byte >> 4)]));
            result.push(char::from(HEX[usize::from(byte & 0x0F)]));
        }
    }
    result
}

/// Outgoing mail settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub from: String,
}

impl MailConfig {
    pub fn from_env() -> Self { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            from: lookup(MAIL_FROM_ENV)
                .filter(|from| !from.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MAIL_FROM.to_owned()),
        }
    }
}
