use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::sync::OnceLock;

use argon2::Argon2;
use rand_core::OsRng;

use crate::errors::AppError;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Argon2 PHC string plus the salt it was derived with.
#[derive(Debug, Clone)]
pub struct SaltedHash {
    pub hash: String,
    pub salt: String,
}

pub fn hash_password(password: &str) -> Result<SaltedHash, AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::internal(format!("failed to hash password: {err}")))?;

    Ok(SaltedHash {
        hash,
        salt: salt.as_str().to_string(),
    })
}

/// A hash whose embedded salt disagrees with the stored salt never verifies.
pub fn verify_password(password: &str, password_hash: &str, salt: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|err| AppError::internal(format!("invalid password hash: {err}")))?;

    if parsed_hash.salt.map(|s| s.as_str()) != Some(salt) {
        return Ok(false);
    }

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn placeholder_hash() -> Option<&'static SaltedHash> {
    static PLACEHOLDER: OnceLock<Option<SaltedHash>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| hash_password("keen-eye-placeholder").ok())
        .as_ref()
}

/// Checks a password on the blocking pool.
///
/// With no stored hash the password is checked against a placeholder hash, so
/// an unknown login costs as much as a wrong password. That case never matches.
pub async fn check_password(password: &str, stored: Option<(&str, &str)>) -> Result<bool, AppError> {
    let password = password.to_owned();
    let stored = stored.map(|(hash, salt)| (hash.to_owned(), salt.to_owned()));

    tokio::task::spawn_blocking(move || match stored {
        Some((hash, salt)) => verify_password(&password, &hash, &salt),
        None => {
            if let Some(placeholder) = placeholder_hash() {
                let _ = verify_password(&password, &placeholder.hash, &placeholder.salt);
            }
            Ok(false)
        }
    })
    .await
    .map_err(|err| AppError::internal(format!("password check task failed: {err}")))?
}
