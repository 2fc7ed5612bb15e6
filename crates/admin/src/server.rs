//! Router assembly.
//!
//! Layers are listed innermost first; the last `.layer` call runs first on
//! the way in. The port normalizer sits just inside the server-port recorder
//! so every other layer and handler sees the normalized request.

use std::time::Duration;

use axum::{Router, middleware::from_fn, middleware::from_fn_with_state};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::db::RecordStore;
use crate::middleware::{
    ServerPort, assume_ssl_middleware, record_server_port, remove_port_middleware,
    request_id_middleware,
};
use crate::routes;
use crate::state::AppState;

/// Directory served under `/assets` when `SERVE_STATIC_FILES` is set.
pub const STATIC_ASSETS_DIR: &str = "public/assets";

/// Build the full admin application.
pub fn build_app<R, S>(state: AppState<R>, session_layer: SessionManagerLayer<S>) -> Router
where
    R: RecordStore + 'static,
    S: SessionStore + Clone,
{
    let config = state.config();
    let server_port = ServerPort(config.port);
    let production = config.environment().is_production();
    let serve_static_files = config.serve_static_files;

    let mut router = routes::routes::<R>();
    if serve_static_files {
        router = router.nest_service("/assets", ServeDir::new(STATIC_ASSETS_DIR));
    }

    let mut app = router
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    if production {
        app = app.layer(from_fn(assume_ssl_middleware));
    }

    app.layer(from_fn(remove_port_middleware))
        .layer(from_fn_with_state(server_port, record_server_port))
}
