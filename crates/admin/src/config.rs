//! Application configuration loaded once at process start.
//!
//! Every environment variable the server, middleware and seeder care about is
//! read here and nowhere else. Components receive the resulting structs by
//! reference, and tests build them from an in-memory variable map through
//! [`AppConfig::from_vars`] / [`BootstrapConfig::from_vars`].
//!
//! Blank values (`FOO=` or whitespace only) are treated as unset. Plain
//! values are trimmed; secrets are kept exactly as given.
//!
//! # Environment Variables
//!
//! ## Required (server and CLI database commands)
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `APP_ENV` - `development` (default), `test` or `production`
//! - `BIND_ADDRESS` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3000)
//! - `HOST` - Public hostname used for URL generation and bootstrap defaults
//! - `SERVE_STATIC_FILES` - When present, serve `/assets` from `public/assets`
//! - `SESSION_COOKIE_DOMAIN` - Cookie domain, e.g. `.example.com`
//! - `LOG_FORMAT` - `text` (default) or `json`
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (bootstrap)
//! - `STORE_NAME` - default `My Store`
//! - `STORE_EMAIL` - default `store@<HOST or localhost>`
//! - `ADMIN_EMAIL` - default `admin@<HOST or localhost>`
//! - `ADMIN_PASSWORD` - default `admin123456`

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

use storekeep_core::{Email, EmailError};

/// Store name used when `STORE_NAME` is unset.
pub const DEFAULT_STORE_NAME: &str = "My Store";
/// Store URL used when `HOST` is unset.
pub const DEFAULT_LOCAL_STORE_URL: &str = "http://localhost:3000";
/// Mail domain used for derived addresses when `HOST` is unset.
pub const DEFAULT_MAIL_DOMAIN: &str = "localhost";
/// Administrator password used when `ADMIN_PASSWORD` is unset.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123456";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Whether this is the production environment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "unknown environment {other:?} (expected development, test or production)"
            )),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        })
    }
}

/// Log output format, selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cookie domain; `None` scopes the cookie to the exact host.
    pub cookie_domain: Option<String>,
    /// Whether to set the `Secure` flag. TLS terminates at the proxy, but
    /// browsers still talk HTTPS, so this is on in production.
    pub secure: bool,
}

/// Values consumed by the bootstrap seeder.
///
/// Only the raw optional values are stored; the derived defaults are
/// computed by the accessor methods so the fallback rules live in one place.
#[derive(Clone, Default)]
pub struct BootstrapConfig {
    /// Deployment environment; seeding of the store and admin only happens in production.
    pub environment: Environment,
    /// Public hostname (`HOST`).
    pub host: Option<String>,
    /// `STORE_NAME`.
    pub store_name: Option<String>,
    /// `STORE_EMAIL`.
    pub store_email: Option<String>,
    /// `ADMIN_EMAIL`.
    pub admin_email: Option<String>,
    /// `ADMIN_PASSWORD`.
    pub admin_password: Option<SecretString>,
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("store_name", &self.store_name)
            .field("store_email", &self.store_email)
            .field("admin_email", &self.admin_email)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl BootstrapConfig {
    /// Load bootstrap values from the process environment (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `APP_ENV` is not a known environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load bootstrap values through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `APP_ENV` is not a known environment.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match get_optional(&lookup, "APP_ENV") {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("APP_ENV".to_string(), e))?,
            None => Environment::default(),
        };

        Ok(Self {
            environment,
            host: get_optional(&lookup, "HOST"),
            store_name: get_optional(&lookup, "STORE_NAME"),
            store_email: get_optional(&lookup, "STORE_EMAIL"),
            admin_email: get_optional(&lookup, "ADMIN_EMAIL"),
            admin_password: get_optional_secret(&lookup, "ADMIN_PASSWORD"),
        })
    }

    /// Canonical store URL: `https://<HOST>`, or the local default.
    #[must_use]
    pub fn store_url(&self) -> String {
        self.host.as_deref().map_or_else(
            || DEFAULT_LOCAL_STORE_URL.to_string(),
            |host| format!("https://{host}"),
        )
    }

    /// Store name to look up or create.
    #[must_use]
    pub fn store_name(&self) -> &str {
        self.store_name.as_deref().unwrap_or(DEFAULT_STORE_NAME)
    }

    /// Store sender address: `STORE_EMAIL`, or `store@<HOST or localhost>`.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the configured or derived address is malformed.
    pub fn store_email(&self) -> Result<Email, EmailError> {
        self.store_email.as_deref().map_or_else(
            || Email::at_domain("store", self.mail_domain()),
            Email::parse,
        )
    }

    /// Administrator address: `ADMIN_EMAIL`, or `admin@<HOST or localhost>`.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the configured or derived address is malformed.
    pub fn admin_email(&self) -> Result<Email, EmailError> {
        self.admin_email.as_deref().map_or_else(
            || Email::at_domain("admin", self.mail_domain()),
            Email::parse,
        )
    }

    /// Administrator password: `ADMIN_PASSWORD`, or the built-in default.
    #[must_use]
    pub fn admin_password(&self) -> SecretString {
        self.admin_password
            .clone()
            .unwrap_or_else(|| SecretString::from(DEFAULT_ADMIN_PASSWORD))
    }

    /// Whether the built-in default password would be used.
    #[must_use]
    pub const fn uses_default_admin_password(&self) -> bool {
        self.admin_password.is_none()
    }

    fn mail_domain(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_MAIL_DOMAIN)
    }
}

/// Admin server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub bind_address: IpAddr,
    /// Port to listen on; this is the port the proxy forwards to and the one
    /// recorded as the request's server port
    pub port: u16,
    /// Serve precompiled assets from `public/assets`
    pub serve_static_files: bool,
    /// Session cookie settings
    pub session: SessionConfig,
    /// Bootstrap values (also carries `environment` and `HOST`)
    pub bootstrap: BootstrapConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = database_url_from_vars(&lookup)?;
        let bind_address = get_or_default(&lookup, "BIND_ADDRESS", DEFAULT_BIND_ADDRESS)
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BIND_ADDRESS".to_string(), e.to_string()))?;
        let port = get_or_default(&lookup, "PORT", DEFAULT_PORT)
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let log_format = match get_optional(&lookup, "LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected text or json, got {other:?}"),
                ));
            }
        };

        let bootstrap = BootstrapConfig::from_vars(&lookup)?;
        let session = SessionConfig {
            cookie_domain: get_optional(&lookup, "SESSION_COOKIE_DOMAIN"),
            secure: bootstrap.environment.is_production(),
        };

        Ok(Self {
            database_url,
            bind_address,
            port,
            serve_static_files: get_optional(&lookup, "SERVE_STATIC_FILES").is_some(),
            session,
            bootstrap,
            log_format,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(&lookup, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_optional(&lookup, "SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: get_optional(&lookup, "SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Deployment environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.bootstrap.environment
    }

    /// Public hostname (`HOST`), if configured.
    #[must_use]
    pub fn public_host(&self) -> Option<&str> {
        self.bootstrap.host.as_deref()
    }
}

/// Database URL for tools that need nothing else (the CLI).
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if `DATABASE_URL` is unset or blank.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    let _ = dotenvy::dotenv();
    database_url_from_vars(&|key: &str| std::env::var(key).ok())
}

/// Database URL through an arbitrary variable lookup.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if `DATABASE_URL` is unset or blank.
pub fn database_url_from_vars<F>(lookup: &F) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    get_required(lookup, "DATABASE_URL").map(SecretString::from)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Get an optional secret. Blank means unset, otherwise the value is kept verbatim.
fn get_optional_secret<F>(lookup: &F, key: &str) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

/// Get a required variable.
fn get_required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    get_optional(lookup, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_bootstrap_defaults_without_host() {
        let config = BootstrapConfig::from_vars(vars(&[])).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.store_url(), "http://localhost:3000");
        assert_eq!(config.store_name(), "My Store");
        assert_eq!(config.store_email().unwrap().as_str(), "store@localhost");
        assert_eq!(config.admin_email().unwrap().as_str(), "admin@localhost");
        assert_eq!(config.admin_password().expose_secret(), "admin123456");
        assert!(config.uses_default_admin_password());
    }

    #[test]
    fn test_bootstrap_defaults_derive_from_host() {
        let config = BootstrapConfig::from_vars(vars(&[("HOST", "shop.example.com")])).unwrap();

        assert_eq!(config.store_url(), "https://shop.example.com");
        assert_eq!(
            config.store_email().unwrap().as_str(),
            "store@shop.example.com"
        );
        assert_eq!(
            config.admin_email().unwrap().as_str(),
            "admin@shop.example.com"
        );
    }

    #[test]
    fn test_bootstrap_explicit_values_win() {
        let config = BootstrapConfig::from_vars(vars(&[
            ("APP_ENV", "production"),
            ("HOST", "shop.example.com"),
            ("STORE_NAME", "Corner Shop"),
            ("STORE_EMAIL", "orders@corner.example"),
            ("ADMIN_EMAIL", "owner@corner.example"),
            ("ADMIN_PASSWORD", "correct horse battery"),
        ]))
        .unwrap();

        assert!(config.environment.is_production());
        assert_eq!(config.store_name(), "Corner Shop");
        assert_eq!(config.store_email().unwrap().as_str(), "orders@corner.example");
        assert_eq!(config.admin_email().unwrap().as_str(), "owner@corner.example");
        assert_eq!(
            config.admin_password().expose_secret(),
            "correct horse battery"
        );
        assert!(!config.uses_default_admin_password());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config =
            BootstrapConfig::from_vars(vars(&[("HOST", "  "), ("STORE_NAME", "")])).unwrap();

        assert!(config.host.is_none());
        assert_eq!(config.store_url(), "http://localhost:3000");
        assert_eq!(config.store_name(), "My Store");
    }

    #[test]
    fn test_admin_password_keeps_surrounding_spaces() {
        let config =
            BootstrapConfig::from_vars(vars(&[("ADMIN_PASSWORD", " pass phrase ")])).unwrap();

        assert_eq!(config.admin_password().expose_secret(), " pass phrase ");
        assert!(!config.uses_default_admin_password());
    }

    #[test]
    fn test_blank_admin_password_falls_back_to_default() {
        let config = BootstrapConfig::from_vars(vars(&[("ADMIN_PASSWORD", "   ")])).unwrap();

        assert!(config.uses_default_admin_password());
        assert_eq!(config.admin_password().expose_secret(), "admin123456");
    }

    #[test]
    fn test_database_url_lookup() {
        let url = database_url_from_vars(&vars(&[(
            "DATABASE_URL",
            " postgres://localhost/storekeep ",
        )]))
        .unwrap();
        assert_eq!(url.expose_secret(), "postgres://localhost/storekeep");

        let err = database_url_from_vars(&vars(&[("DATABASE_URL", " ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "DATABASE_URL"));
    }

    #[test]
    fn test_malformed_store_email_is_reported() {
        let config = BootstrapConfig::from_vars(vars(&[("STORE_EMAIL", "nope")])).unwrap();
        assert_eq!(config.store_email(), Err(EmailError::MissingAtSymbol));
    }

    #[test]
    fn test_unknown_environment() {
        let err = BootstrapConfig::from_vars(vars(&[("APP_ENV", "staging")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "APP_ENV"));
    }

    #[test]
    fn test_bootstrap_debug_redacts_password() {
        let config =
            BootstrapConfig::from_vars(vars(&[("ADMIN_PASSWORD", "hunter2-but-longer")])).unwrap();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2-but-longer"));
    }

    #[test]
    fn test_app_config_requires_database_url() {
        let err = AppConfig::from_vars(vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "DATABASE_URL"));
    }

    #[test]
    fn test_app_config_defaults() {
        let config =
            AppConfig::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/storekeep")]))
                .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.environment(), Environment::Development);
        assert!(!config.serve_static_files);
        assert!(!config.session.secure);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.public_host().is_none());
    }

    #[test]
    fn test_app_config_production() {
        let config = AppConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/storekeep"),
            ("APP_ENV", "production"),
            ("HOST", "shop.example.com"),
            ("PORT", "8080"),
            ("SERVE_STATIC_FILES", "1"),
            ("SESSION_COOKIE_DOMAIN", ".example.com"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.serve_static_files);
        assert!(config.session.secure);
        assert_eq!(config.session.cookie_domain.as_deref(), Some(".example.com"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.public_host(), Some("shop.example.com"));
    }

    #[test]
    fn test_app_config_invalid_port() {
        let err = AppConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/storekeep"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "PORT"));
    }
}
