//! # CLI Validate Command
//!
//! Checks the configuration, connects to the database and reports pending
//! migrations.

use error::{AppError, Result};
use migration::MigratorTrait as _;
use tracing::{info, warn};
use validator::ValidateEmail;

use crate::config::{DatabaseConfig, MailConfig};

/// Check the settings that do not need a database
pub fn validate_settings(mail: &MailConfig) -> Result<()> {
    if !mail.from.validate_email() {
        return Err(AppError::config(format!(
            "DIRECTORY_MAIL_FROM is not a valid email address: {}",
            mail.from
        )));
    }
    Ok(())
}

pub async fn validate(config: &DatabaseConfig, mail: &MailConfig) -> Result<()> {
    info!(target: "validate", "Validating configuration...");
    validate_settings(mail)?;

    let db = migration::connect_to_database(&config.database_url(), 1)
        .await
        .map_err(|e| AppError::config(format!("Cannot connect to database: {}", e)))?;
    let pending = migration::Migrator::get_pending_migrations(&db).await?;

    if pending.is_empty() {
        info!(target: "validate", "Configuration is valid and the schema is up to date");
    }
    else {
        warn!(
            target: "validate",
            pending_count = pending.len(),
            "Configuration is valid but migrations are pending"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_from_must_be_an_email() {
        let ok = MailConfig {
            from: "noreply@directory.local".into(),
        };
        assert!(validate_settings(&ok).is_ok());

        let bad = MailConfig {
            from: "directory".into(),
        };
        assert_eq!(validate_settings(&bad).unwrap_err().code(), "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn test_validate_against_fresh_sqlite() {
        let config = DatabaseConfig {
            url:       Some("sqlite::memory:".into()),
            host:      String::new(),
            port:      5432,
            database:  String::new(),
            username:  String::new(),
            password:  String::new(),
            ssl_mode:  String::new(),
            pool_size: 1,
        };
        let mail = MailConfig {
            from: "noreply@directory.local".into(),
        };
        assert!(validate(&config, &mail).await.is_ok());
    }
}
