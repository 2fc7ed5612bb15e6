//! Port normalization for requests arriving through the TLS-terminating proxy.
//!
//! The proxy forwards plain HTTP to the app's internal port. Left alone, that
//! port is picked up by URL generation ([`crate::urls::RequestOrigin`]) and
//! leaks into absolute URLs and redirects as `https://shop.example.com:3000/...`.
//!
//! [`remove_port_middleware`] runs before everything else in the app and
//! rewrites the two port-related fields of the request:
//!
//! - the server port recorded by the listener ([`ServerPort`]) is removed
//! - the `x-forwarded-port` header is set to `443`
//!
//! Nothing else on the request is read or modified.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// The forwarded-port header consulted by URL generation.
pub const X_FORWARDED_PORT: HeaderName = HeaderName::from_static("x-forwarded-port");

/// Value written to `x-forwarded-port`: the public HTTPS port.
pub const FORWARDED_HTTPS_PORT: &str = "443";

/// Port the listener accepted the request on.
///
/// Inserted as a request extension by [`record_server_port`], the equivalent
/// of a CGI `SERVER_PORT` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerPort(pub u16);

/// Strip the server port and pin the forwarded port to `443`.
///
/// Total over any request and idempotent.
pub fn normalize_port<B>(request: &mut axum::http::Request<B>) {
    request.extensions_mut().remove::<ServerPort>();
    // `insert` replaces every existing value, so repeated headers collapse to one.
    request.headers_mut().insert(
        X_FORWARDED_PORT,
        HeaderValue::from_static(FORWARDED_HTTPS_PORT),
    );
}

/// Middleware applying [`normalize_port`] to every request.
///
/// Must be the outermost application layer so routing, sessions and URL
/// generation only ever see the normalized request.
pub async fn remove_port_middleware(mut request: Request, next: Next) -> Response {
    normalize_port(&mut request);
    next.run(request).await
}

/// Record the listener's port on the request as a [`ServerPort`] extension.
///
/// Installed with `axum::middleware::from_fn_with_state(ServerPort(port), record_server_port)`
/// outside [`remove_port_middleware`].
pub async fn record_server_port(
    State(port): State<ServerPort>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(port);
    next.run(request).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{HeaderMap, Method, StatusCode},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    fn request_with(server_port: Option<u16>, forwarded_ports: &[&str]) -> Request {
        let mut builder = axum::http::Request::builder()
            .method(Method::GET)
            .uri("/admin?tab=orders")
            .header("host", "shop.example.com")
            .header("x-forwarded-proto", "https")
            .header("x-forwarded-for", "203.0.113.7");
        for port in forwarded_ports {
            builder = builder.header(X_FORWARDED_PORT, *port);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(port) = server_port {
            request.extensions_mut().insert(ServerPort(port));
        }
        request
    }

    fn forwarded_ports(headers: &HeaderMap) -> Vec<&str> {
        headers
            .get_all(X_FORWARDED_PORT)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect()
    }

    #[test]
    fn test_normalize_removes_server_port_and_sets_forwarded_port() {
        let cases: [(Option<u16>, &[&str]); 5] = [
            (None, &[]),
            (Some(3000), &[]),
            (Some(3000), &["80"]),
            (None, &["8443"]),
            (Some(80), &["80", "3000"]),
        ];

        for (server_port, forwarded) in cases {
            let mut request = request_with(server_port, forwarded);
            normalize_port(&mut request);

            assert!(
                request.extensions().get::<ServerPort>().is_none(),
                "server port survived for {server_port:?} / {forwarded:?}"
            );
            assert_eq!(forwarded_ports(request.headers()), vec!["443"]);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut once = request_with(Some(3000), &["80"]);
        normalize_port(&mut once);

        let mut twice = request_with(Some(3000), &["80"]);
        normalize_port(&mut twice);
        normalize_port(&mut twice);

        assert_eq!(once.headers(), twice.headers());
        assert_eq!(once.uri(), twice.uri());
        assert_eq!(
            once.extensions().get::<ServerPort>(),
            twice.extensions().get::<ServerPort>()
        );
    }

    #[test]
    fn test_normalize_leaves_other_fields_alone() {
        let original = request_with(Some(3000), &[]);
        let mut request = request_with(Some(3000), &[]);
        normalize_port(&mut request);

        assert_eq!(request.method(), original.method());
        assert_eq!(request.uri(), original.uri());
        for name in ["host", "x-forwarded-proto", "x-forwarded-for"] {
            assert_eq!(request.headers().get(name), original.headers().get(name));
        }
        assert_eq!(request.headers().len(), original.headers().len() + 1);
    }

    #[tokio::test]
    async fn test_middleware_runs_before_handlers() {
        async fn inspect(request: Request) -> StatusCode {
            let port_gone = request.extensions().get::<ServerPort>().is_none();
            let forwarded = request
                .headers()
                .get(X_FORWARDED_PORT)
                .and_then(|v| v.to_str().ok());
            if port_gone && forwarded == Some(FORWARDED_HTTPS_PORT) {
                StatusCode::NO_CONTENT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }

        let app = Router::new()
            .route("/admin", get(inspect))
            .layer(middleware::from_fn(remove_port_middleware))
            .layer(middleware::from_fn_with_state(
                ServerPort(3000),
                record_server_port,
            ));

        let response = app.oneshot(request_with(None, &["80"])).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_record_server_port_inserts_extension() {
        async fn echo_port(request: Request) -> String {
            request
                .extensions()
                .get::<ServerPort>()
                .map_or_else(|| "none".to_string(), |p| p.0.to_string())
        }

        let app = Router::new()
            .route("/admin", get(echo_port))
            .layer(middleware::from_fn_with_state(
                ServerPort(3000),
                record_server_port,
            ));

        let response = app.oneshot(request_with(None, &[])).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"3000");
    }
}
