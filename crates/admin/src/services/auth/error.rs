//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors from password hashing and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Password is shorter than the minimum length.
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },

    /// Password is longer than the maximum length.
    #[error("password must be at most {max} characters")]
    TooLong { max: usize },

    /// Argon2 failed to produce a hash.
    #[error("failed to hash password")]
    Hash,
}

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The account exists but lacks the `admin` role.
    #[error("account is not authorized for the admin backend")]
    NotAuthorized,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
