//! Password hashing
//!
//! `PasswordHash` wraps a salted bcrypt hash. Plaintext passwords are checked
//! against bcrypt's input limit up front so that nothing is ever truncated
//! silently.

use std::fmt;

use bcrypt::{hash, verify, BcryptError};

use crate::domain::DomainError;

/// bcrypt only consumes this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Errors raised while hashing or verifying a password
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A salted and hashed password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Check that a plaintext password can be hashed without loss.
    pub fn validate(raw_password: &str) -> Result<(), DomainError> {
        if raw_password.is_empty() {
            return Err(DomainError::EmptyField("password"));
        }
        if raw_password.len() > MAX_PASSWORD_BYTES {
            return Err(DomainError::PasswordTooLong {
                max: MAX_PASSWORD_BYTES,
            });
        }
        Ok(())
    }

    /// Hash a plaintext password with the given bcrypt `cost`.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::Invalid`] for empty or over-long passwords and
    /// [`PasswordError::Hashing`] if bcrypt itself fails.
    pub fn new(raw_password: &str, cost: u32) -> Result<Self, PasswordError> {
        Self::validate(raw_password)?;
        Ok(Self(hash(raw_password, cost)?))
    }

    /// Wrap a hash loaded from storage.
    pub fn from_stored(stored_hash: impl Into<String>) -> Self {
        Self(stored_hash.into())
    }

    /// Check that `raw_password` matches this hash.
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] can never have been
    /// hashed, so they never match.
    pub fn verify(&self, raw_password: &str) -> Result<bool, PasswordError> {
        if raw_password.is_empty() || raw_password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        Ok(verify(raw_password, &self.0)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hash on the blocking thread pool; bcrypt is deliberately slow.
pub async fn hash_in_background(raw_password: String, cost: u32) -> Result<PasswordHash, PasswordError> {
    PasswordHash::validate(&raw_password)?;
    tokio::task::spawn_blocking(move || PasswordHash::new(&raw_password, cost))
        .await?
}

/// Verify on the blocking thread pool.
pub async fn verify_in_background(
    hash: PasswordHash,
    raw_password: String,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || hash.verify(&raw_password))
        .await?
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(********)")
    }
}
