//! Session middleware configuration.
//!
//! `PostgreSQL`-backed sessions using tower-sessions. The cookie is `Lax` so
//! the sign-in redirect chain through the CDN keeps it, `HttpOnly` always,
//! and `Secure` in production.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::SameSite};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::SessionConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "_storekeep_session";

/// Schema holding the session table (created by migrations).
const SESSION_SCHEMA: &str = "storekeep";
const SESSION_TABLE: &str = "session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// The session store could not be configured.
#[derive(Debug, Error)]
#[error("session store setup failed: {0}")]
pub struct SessionSetupError(String);

/// Create the session layer with `PostgreSQL` store.
///
/// # Errors
///
/// Returns `SessionSetupError` if the schema or table name is rejected by the store.
pub fn create_session_layer(
    pool: &PgPool,
    config: &SessionConfig,
) -> Result<SessionManagerLayer<PostgresStore>, SessionSetupError> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA)
        .map_err(|e| SessionSetupError(e.to_string()))?
        .with_table_name(SESSION_TABLE)
        .map_err(|e| SessionSetupError(e.to_string()))?;

    let mut layer = SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/");

    if let Some(domain) = &config.cookie_domain {
        layer = layer.with_domain(domain.clone());
    }

    Ok(layer)
}
