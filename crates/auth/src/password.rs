//! Password hashing, verification and generation.
//!
//! Hashes use Argon2id and are stored in the PHC-like form
//! `$argon2id$v=19$m=<kib>,t=<iterations>,p=<lanes>$<salt_b64>$<hash_b64>`.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::prelude::*;
use rand::{Rng, RngCore, distr::Alphanumeric, rng};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Length of passwords issued by the reset flow
pub const RESET_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: password does not match")]
    VerificationFailed,

    #[error("Invalid hash format")]
    InvalidHashFormat,

    #[error("Base64 decoding failed: {0}")]
    DecodingFailed(#[from] base64::DecodeError),
}

impl From<PasswordError> for error::AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::VerificationFailed => error::AppError::unauthorized(err.to_string()),
            other => error::AppError::internal(other.to_string()),
        }
    }
}

/// Configuration for Argon2id password hashing.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 15 MiB = 15360 KiB)
    pub memory_cost: u32,
    /// Number of iterations (default: 3)
    pub time_cost:   u32,
    /// Number of lanes (default: 2)
    pub parallelism: u32,
    /// Length of the generated hash (default: 32 bytes)
    pub hash_length: u32,
    /// Length of the salt (default: 16 bytes)
    pub salt_length: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 15360,
            time_cost:   3,
            parallelism: 2,
            hash_length: 32,
            salt_length: 16,
        }
    }
}

fn argon2(memory_cost: u32, time_cost: u32, parallelism: u32, output_len: usize) -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(memory_cost, time_cost, parallelism, Some(output_len))
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password using Argon2id.
///
/// # Example
///
/// ```
/// use auth::password::hash_password;
/// use secrecy::SecretString;
///
/// let password = SecretString::from("k3yb0ard".to_string());
/// let hash = hash_password(&password, None).unwrap();
/// ```
pub fn hash_password(password: &SecretString, config: Option<PasswordConfig>) -> Result<SecretString, PasswordError> {
    let config = config.unwrap_or_default();

    let mut salt = vec![0u8; config.salt_length as usize];
    rng().fill_bytes(&mut salt);

    let mut output = vec![0u8; config.hash_length as usize];
    argon2(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        config.hash_length as usize,
    )?
    .hash_password_into(password.expose_secret().as_bytes(), &salt, &mut output)
    .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(SecretString::from(format!(
        "$argon2id$v=19$m={},t={},p={}${}${}",
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        BASE64_STANDARD.encode(&salt),
        BASE64_STANDARD.encode(&output)
    )))
}

/// Reads `m=..,t=..,p=..` into (memory, time, parallelism).
fn parse_params(params: &str) -> Result<(u32, u32, u32), PasswordError> {
    let mut memory = None;
    let mut time = None;
    let mut lanes = None;

    for pair in params.split(',') {
        let (key, value) = pair.split_once('=').ok_or(PasswordError::InvalidHashFormat)?;
        let value: u32 = value.parse().map_err(|_| PasswordError::InvalidHashFormat)?;
        match key {
            "m" => memory = Some(value),
            "t" => time = Some(value),
            "p" => lanes = Some(value),
            _ => return Err(PasswordError::InvalidHashFormat),
        }
    }

    match (memory, time, lanes) {
        (Some(m), Some(t), Some(p)) => Ok((m, t, p)),
        _ => Err(PasswordError::InvalidHashFormat),
    }
}

/// Verifies a password against a stored hash.
///
/// # Example
///
/// ```
/// use auth::password::{hash_password, verify_password};
/// use secrecy::{ExposeSecret, SecretString};
///
/// let password = SecretString::from("k3yb0ard".to_string());
/// let hash = hash_password(&password, None).unwrap();
///
/// assert!(verify_password(&password, hash.expose_secret()).is_ok());
/// ```
pub fn verify_password(password: &SecretString, expected_hash: &str) -> Result<(), PasswordError> {
    // ["", "argon2id", "v=19", "m=..,t=..,p=..", salt, hash]
    let parts: Vec<&str> = expected_hash.split('$').collect();
    let [empty, algorithm, version, params, salt_b64, hash_b64] = parts.as_slice()
    else {
        return Err(PasswordError::InvalidHashFormat);
    };
    if !empty.is_empty() || *algorithm != "argon2id" || *version != "v=19" {
        return Err(PasswordError::InvalidHashFormat);
    }

    let (memory_cost, time_cost, parallelism) = parse_params(params)?;
    let salt = BASE64_STANDARD.decode(salt_b64)?;
    let stored_hash = BASE64_STANDARD.decode(hash_b64)?;
    if stored_hash.is_empty() {
        return Err(PasswordError::InvalidHashFormat);
    }

    let mut computed_hash = vec![0u8; stored_hash.len()];
    argon2(memory_cost, time_cost, parallelism, stored_hash.len())?
        .hash_password_into(password.expose_secret().as_bytes(), &salt, &mut computed_hash)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    if computed_hash.as_slice().ct_eq(&stored_hash).into() {
        Ok(())
    }
    else {
        Err(PasswordError::VerificationFailed)
    }
}

/// Generates a random alphanumeric password of the given length.
pub fn generate_password(length: usize) -> SecretString {
    let password: String = rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();
    SecretString::from(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> Option<PasswordConfig> {
        Some(PasswordConfig {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            ..PasswordConfig::default()
        })
    }

    #[test]
    fn test_hash_and_verify() {
        let password = SecretString::from("Kotik2024".to_string());
        let hash = hash_password(&password, fast_config()).unwrap();
        let result = verify_password(&password, hash.expose_secret());
        assert!(result.is_ok(), "Verification failed: {:?}", result);
    }

    #[test]
    fn test_hash_format() {
        let password = SecretString::from("Kotik2024".to_string());
        let hash = hash_password(&password, fast_config()).unwrap();
        assert!(hash.expose_secret().starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
    }

    #[test]
    fn test_wrong_password_fails() {
        let password = SecretString::from("CorrectPassword".to_string());
        let wrong_password = SecretString::from("WrongPassword".to_string());
        let hash = hash_password(&password, fast_config()).unwrap();
        assert!(matches!(
            verify_password(&wrong_password, hash.expose_secret()),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        let password = SecretString::from("whatever".to_string());
        assert!(matches!(
            verify_password(&password, "plaintext"),
            Err(PasswordError::InvalidHashFormat)
        ));
        assert!(matches!(
            verify_password(&password, "$argon2i$v=19$m=1024,t=1,p=1$c2FsdA==$aGFzaA=="),
            Err(PasswordError::InvalidHashFormat)
        ));
        assert!(matches!(
            verify_password(&password, "$argon2id$v=19$m=1024,t=1$c2FsdA==$aGFzaA=="),
            Err(PasswordError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_generate_password() {
        let password = generate_password(RESET_PASSWORD_LENGTH);
        assert_eq!(password.expose_secret().len(), 8);
        assert!(password.expose_secret().chars().all(|c| c.is_ascii_alphanumeric()));

        let other = generate_password(RESET_PASSWORD_LENGTH);
        assert_ne!(password.expose_secret(), other.expose_secret());
    }
}
