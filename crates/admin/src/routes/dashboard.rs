//! Admin landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::{
    db::RecordStore,
    error::AppError,
    middleware::auth::RequireAdminAuth,
    models::Store,
    routes::sessions::SIGN_OUT_PATH,
    state::AppState,
};

/// Store summary for templates.
#[derive(Debug, Clone)]
pub struct StoreView {
    pub name: String,
    pub url: String,
    pub currency: String,
    pub mail_from_address: String,
}

impl From<&Store> for StoreView {
    fn from(store: &Store) -> Self {
        Self {
            name: store.name.clone(),
            url: store.url.clone().unwrap_or_else(|| "(not set)".to_string()),
            currency: store.default_currency.to_string(),
            mail_from_address: store
                .mail_from_address
                .as_ref()
                .map_or_else(|| "(not set)".to_string(), ToString::to_string),
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub admin_email: String,
    pub store: Option<StoreView>,
    pub public_url: Option<String>,
    pub sign_out_action: &'static str,
}

/// Dashboard page handler.
///
/// GET /admin
#[instrument(skip_all)]
pub async fn dashboard<R: RecordStore + 'static>(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState<R>>,
) -> Result<DashboardTemplate, AppError> {
    let store_name = state.config().bootstrap.store_name();
    let store = state.records().find_store_by_name(store_name).await?;

    if store.is_none() {
        tracing::warn!(store_name, "Store record missing, run `sk-cli seed`");
    }

    Ok(DashboardTemplate {
        admin_email: admin.email.to_string(),
        store: store.as_ref().map(StoreView::from),
        public_url: state.url_options().and_then(|o| o.url_for("/")),
        sign_out_action: SIGN_OUT_PATH,
    })
}
