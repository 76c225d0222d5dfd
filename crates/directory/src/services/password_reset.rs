//! # Password Reset
//!
//! Issues a fresh random password for the employee with the given email and
//! mails it through the outbox. The hash and the queued email are written in
//! one transaction.

use auth::{generate_password, hash_password, verify_password, Caller, RESET_PASSWORD_LENGTH};
use entity::{employees, Employees};
use error::{AppError, Result};
use logging::log_security_event;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use super::FieldErrors;
use crate::{dto::employees::PasswordResetRequest, outbox, Directory};

pub const RESET_SUBJECT: &str = "Восстановление пароля";
pub const UNKNOWN_EMAIL: &str = "Пользователя с таким email нет в системе.";

impl Directory {
    /// Reset the password of the employee registered under `req.email`.
    ///
    /// Returns the outbox row holding the new password email.
    pub async fn reset_password(&self, req: PasswordResetRequest) -> Result<i32> {
        FieldErrors::validate(&req).into_result()?;

        let txn = self.db.begin().await?;
        let employee = Employees::find()
            .filter(employees::Column::Email.eq(req.email.as_str()))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::field("email", UNKNOWN_EMAIL))?;

        let password = generate_password(RESET_PASSWORD_LENGTH);
        let hash = hash_password(&password, None)?;

        let email = employee.email.clone();
        let employee_id = employee.id;
        let mut active: employees::ActiveModel = employee.into();
        active.password_hash = Set(Some(hash.expose_secret().to_string()));
        active.update(&txn).await?;

        let outbox_id = outbox::enqueue(
            &txn,
            RESET_SUBJECT,
            format!("Ваш новый пароль: {}", password.expose_secret()),
            vec![email],
        )
        .await?
        .ok_or_else(|| AppError::internal("Password reset email was not queued"))?;
        txn.commit().await?;
        self.notifier.notify();

        info!(employee_id, outbox_id, "Password reset issued");
        Ok(outbox_id)
    }

    /// Resolve a caller from login credentials
    pub async fn authenticate(&self, email: &str, password: &SecretString) -> Result<Caller> {
        let employee = Employees::find()
            .filter(employees::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .filter(employees::Model::is_active);

        let Some((employee, hash)) = employee.and_then(|e| e.password_hash.clone().map(|h| (e, h)))
        else {
            log_security_event!("login_failed", 0, email);
            return Err(AppError::unauthorized("Invalid email or password"));
        };

        if verify_password(password, &hash).is_err() {
            log_security_event!("login_failed", employee.id, email);
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        Ok(Caller::new(employee.id, employee.is_superuser))
    }
}
