//! `sk-cli` subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

use storekeep_admin::bootstrap::BootstrapError;
use storekeep_admin::config::{self, ConfigError};
use storekeep_admin::db;
use storekeep_core::EmailError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Seeding or admin provisioning failed.
    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),

    /// Invalid email given on the command line or in the environment.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Connect to the database named by `DATABASE_URL`.
async fn connect() -> Result<PgPool, CommandError> {
    let database_url = config::database_url_from_env()?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
