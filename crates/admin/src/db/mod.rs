//! Persistence for the records the bootstrap layer manages.
//!
//! # Schema: `storekeep`
//!
//! - `store` - Canonical store record (name, URL, currency, sender address)
//! - `admin_user` - Administrator accounts (unique email, Argon2id hash)
//! - `role` - Named roles (unique name)
//! - `admin_user_role` - Role grants (no uniqueness constraint; callers check membership)
//! - `session` - tower-sessions storage
//!
//! # Backends
//!
//! [`RecordStore`] is the seam between the bootstrap/auth logic and storage:
//! [`PgRecordStore`] talks to `PostgreSQL` through the per-table repositories,
//! [`MemoryRecordStore`] keeps everything in process for tests and dry runs.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p storekeep-cli -- migrate
//! ```

pub mod admin_users;
pub mod memory;
pub mod pg;
pub mod record_store;
pub mod roles;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use memory::MemoryRecordStore;
pub use pg::PgRecordStore;
pub use record_store::{NewStore, RecordStore};
pub use roles::RoleRepository;
pub use stores::StoreRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map unique violations to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
