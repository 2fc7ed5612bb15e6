//! Absolute URL generation.
//!
//! [`RequestOrigin`] rebuilds the public origin of the current request from
//! its headers and the listener's [`ServerPort`], the way a reverse-proxied
//! app has to. [`UrlOptions`] covers URLs generated outside a request.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderName, header, request::Parts},
};
use url::Url;

use crate::middleware::assume_ssl::X_FORWARDED_PROTO;
use crate::middleware::remove_port::{ServerPort, X_FORWARDED_PORT};

/// Default URL parts for links generated without a request.
///
/// Always HTTPS and never a port: TLS terminates at the proxy on 443.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOptions {
    pub host: String,
    pub protocol: &'static str,
    pub port: Option<u16>,
}

impl UrlOptions {
    /// Production options for `host`.
    #[must_use]
    pub fn production(host: &str) -> Self {
        Self {
            host: host.to_owned(),
            protocol: "https",
            port: None,
        }
    }

    /// Absolute URL for `path`, or `None` if the host is not a valid URL host.
    #[must_use]
    pub fn url_for(&self, path: &str) -> Option<String> {
        let mut base = Url::parse(&format!("{}://{}", self.protocol, self.host)).ok()?;
        base.set_port(self.port).ok()?;
        base.join(path).ok().map(String::from)
    }
}

/// Scheme, host and port the client used to reach the app.
///
/// Port precedence: explicit port in `Host`, then `x-forwarded-port`, then the
/// listener's [`ServerPort`], then the scheme default. Default ports are
/// omitted from generated URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl RequestOrigin {
    /// Derive the origin from request parts.
    #[must_use]
    pub fn from_parts(parts: &Parts) -> Self {
        let scheme = forwarded_scheme(&parts.headers).unwrap_or("http").to_owned();

        let (host, host_port) = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| parts.uri.authority().map(axum::http::uri::Authority::as_str))
            .map_or(("localhost", None), split_host_port);

        let port = host_port
            .or_else(|| first_value(&parts.headers, &X_FORWARDED_PORT)?.parse().ok())
            .or_else(|| parts.extensions.get::<ServerPort>().map(|p| p.0));

        Self {
            scheme,
            host: host.to_owned(),
            port,
        }
    }

    /// Absolute URL for `path` on this origin.
    ///
    /// Falls back to the bare path if the host header is unusable.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        self.base_url()
            .and_then(|base| base.join(path).ok())
            .map_or_else(|| path.to_owned(), String::from)
    }

    fn base_url(&self) -> Option<Url> {
        let mut base = Url::parse(&format!("{}://{}", self.scheme, self.host)).ok()?;
        // `Url` drops the port when it is the scheme's default.
        base.set_port(self.port).ok()?;
        Some(base)
    }
}

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

fn first_value<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    let value = headers.get(name)?.to_str().ok()?;
    value.split(',').next().map(str::trim).filter(|v| !v.is_empty())
}

fn forwarded_scheme(headers: &HeaderMap) -> Option<&'static str> {
    match first_value(headers, &X_FORWARDED_PROTO)? {
        s if s.eq_ignore_ascii_case("https") => Some("https"),
        s if s.eq_ignore_ascii_case("http") => Some("http"),
        _ => None,
    }
}

/// Split `host[:port]`, keeping bracketed IPv6 literals intact.
fn split_host_port(authority: &str) -> (&str, Option<u16>) {
    if let Some((host, port)) = authority.rsplit_once(':')
        && (!host.contains(':') || host.ends_with(']'))
        && let Ok(port) = port.parse()
    {
        return (host, Some(port));
    }
    (authority, None)
}
