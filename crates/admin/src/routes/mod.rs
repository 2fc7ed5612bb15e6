//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /up                     - Liveness check
//! GET  /up/ready               - Readiness check (database)
//!
//! # Sessions
//! GET  /admin_user/sign_in     - Sign-in form
//! POST /admin_user/sign_in     - Check credentials, start session
//! POST /admin_user/sign_out    - End session
//!
//! # Dashboard
//! GET  /admin                  - Landing page (auth required)
//! ```

pub mod dashboard;
pub mod sessions;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::db::RecordStore;
use crate::state::AppState;

pub use sessions::{AdminSessions, SessionRedirects};

/// Build the application routes.
pub fn routes<R: RecordStore + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/up", get(health))
        .route("/up/ready", get(readiness::<R>))
        .route(sessions::ADMIN_ROOT_PATH, get(dashboard::dashboard::<R>))
        .merge(sessions::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness<R: RecordStore + 'static>(State(state): State<AppState<R>>) -> StatusCode {
    match state.records().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
