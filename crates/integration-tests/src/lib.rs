//! Integration tests for Storekeep.
//!
//! Everything here runs in process: the admin app is driven through
//! `tower::ServiceExt::oneshot` with [`MemoryRecordStore`] records and a
//! tower-sessions `MemoryStore`, so no database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storekeep-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `bootstrap_seeder` - Seeder runs configured from environment variables
//! - `port_normalizer` - Generated URLs with and without the normalizer
//! - `admin_sessions` - Sign-in/sign-out redirects over HTTP

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use storekeep_admin::config::AppConfig;
use storekeep_admin::db::MemoryRecordStore;
use storekeep_admin::middleware::SESSION_COOKIE_NAME;
use storekeep_admin::server::build_app;
use storekeep_admin::state::AppState;

/// Variable lookup over a fixed set of pairs.
pub fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

/// Production settings for `shop.example.com` behind a proxy forwarding to port 3000.
pub fn production_config() -> AppConfig {
    AppConfig::from_vars(vars(&[
        ("APP_ENV", "production"),
        ("DATABASE_URL", "postgres://localhost/storekeep_test"),
        ("PORT", "3000"),
        ("HOST", "shop.example.com"),
        ("ADMIN_PASSWORD", "correct horse battery"),
    ]))
    .unwrap()
}

/// In-memory session layer configured like the production one.
pub fn memory_session_layer() -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(false)
}

/// The full admin app over the given records.
pub fn app(config: AppConfig, records: MemoryRecordStore) -> Router {
    build_app(AppState::new(config, records), memory_session_layer())
}

/// A request as the proxy forwards it: public host, https, no port anywhere.
pub fn proxied(method: &str, path: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::HOST, "shop.example.com")
        .header("x-forwarded-proto", "https")
}

/// Send one request through a clone of `app`.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// The `Location` header of a response.
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// The session cookie pair (`name=value`) set by a response, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(SESSION_COOKIE_NAME))
        .map(String::from)
}

/// Response body as a string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
