//! Bootstrap error types.

use storekeep_core::EmailError;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::PasswordError;

/// Errors that abort a bootstrap run.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A configured or derived email address is malformed.
    #[error("invalid {field}: {source}")]
    InvalidEmail {
        /// Which setting produced the address (e.g. `ADMIN_EMAIL`).
        field: &'static str,
        #[source]
        source: EmailError,
    },

    /// The administrator password was rejected or could not be hashed.
    #[error("invalid admin password: {0}")]
    Password(#[from] PasswordError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
