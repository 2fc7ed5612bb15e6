//! Treat every request as HTTPS in production.
//!
//! TLS is terminated by the CDN/load balancer, which may forward
//! `x-forwarded-proto: http` for the hop it makes to us. Generated URLs must
//! still say `https`, so in production the forwarded scheme is overwritten.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// The forwarded-scheme header consulted by URL generation.
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Mark the request as having arrived over HTTPS.
pub async fn assume_ssl_middleware(mut request: Request, next: Next) -> Response {
    request
        .headers_mut()
        .insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));
    next.run(request).await
}
