//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Server port recorder (listener port as a request extension)
//! 2. Port normalizer (strip the internal port before anything reads it)
//! 3. Assume SSL (production only)
//! 4. Sentry layers (hub per request, transaction)
//! 5. `TraceLayer` (request tracing)
//! 6. Request ID (add unique ID to each request)
//! 7. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Authentication is enforced per handler with the [`auth`] extractors.

pub mod assume_ssl;
pub mod auth;
pub mod remove_port;
pub mod request_id;
pub mod session;

pub use assume_ssl::assume_ssl_middleware;
pub use auth::{OptionalAdminAuth, RequireAdminAuth, clear_current_admin, set_current_admin};
pub use remove_port::{ServerPort, normalize_port, record_server_port, remove_port_middleware};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
