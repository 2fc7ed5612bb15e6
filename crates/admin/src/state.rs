//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::PgRecordStore;
use crate::urls::UrlOptions;

/// Application state shared across all handlers.
///
/// Generic over the record backend so handlers can be exercised against
/// [`crate::db::MemoryRecordStore`] in tests.
pub struct AppState<R = PgRecordStore> {
    inner: Arc<AppStateInner<R>>,
}

struct AppStateInner<R> {
    config: AppConfig,
    records: R,
    url_options: Option<UrlOptions>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> AppState<R> {
    /// Build the state. URL options are derived from `HOST` in production.
    #[must_use]
    pub fn new(config: AppConfig, records: R) -> Self {
        let url_options = config
            .environment()
            .is_production()
            .then(|| config.public_host().map(UrlOptions::production))
            .flatten();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                records,
                url_options,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn records(&self) -> &R {
        &self.inner.records
    }

    /// Defaults for URLs generated outside a request; `None` outside production.
    #[must_use]
    pub fn url_options(&self) -> Option<&UrlOptions> {
        self.inner.url_options.as_ref()
    }
}
