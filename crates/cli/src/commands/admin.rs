//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the default admin from ADMIN_EMAIL / ADMIN_PASSWORD (or their fallbacks)
//! sk-cli admin create
//!
//! # Create a specific admin
//! sk-cli admin create -e ops@example.com -p 'long passphrase'
//! ```
//!
//! Existing accounts are left untouched. No roles are granted; `sk-cli seed`
//! grants the `admin` role to the configured admin.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use secrecy::SecretString;

use storekeep_admin::bootstrap::{Outcome, ensure_admin};
use storekeep_admin::config::BootstrapConfig;
use storekeep_admin::db::PgRecordStore;
use storekeep_core::Email;

use super::{CommandError, connect};

/// Find or create an admin user.
///
/// # Errors
///
/// Returns `CommandError` if the email or password is invalid or the database fails.
pub async fn create_user(
    email: Option<&str>,
    password: Option<String>,
) -> Result<(), CommandError> {
    let config = BootstrapConfig::from_env()?;

    let email = match email {
        Some(email) => Email::parse(email)?,
        None => config.admin_email()?,
    };
    let password = password.map_or_else(|| config.admin_password(), SecretString::from);

    let records = PgRecordStore::new(connect().await?);
    let (admin, outcome) = ensure_admin(&records, &email, &password).await?;

    match outcome {
        Outcome::Created => tracing::info!(admin_id = %admin.id, email = %admin.email, "Admin user created"),
        Outcome::AlreadyPresent => {
            tracing::info!(admin_id = %admin.id, email = %admin.email, "Admin user already exists, left unchanged");
        }
    }
    Ok(())
}
