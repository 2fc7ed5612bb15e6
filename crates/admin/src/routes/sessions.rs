//! Admin sign-in and sign-out.
//!
//! Where the browser lands after signing in or out is decided by the
//! [`SessionRedirects`] hooks. Redirects are absolute URLs built from the
//! request's [`RequestOrigin`], so they inherit whatever the port normalizer
//! did to the request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::RecordStore;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::{AdminAuthError, AdminAuthService};
use crate::state::AppState;
use crate::urls::RequestOrigin;

/// Admin landing page.
pub const ADMIN_ROOT_PATH: &str = "/admin";

/// Sign-in form.
pub const SIGN_IN_PATH: &str = "/admin_user/sign_in";

/// Sign-out action.
pub const SIGN_OUT_PATH: &str = "/admin_user/sign_out";

/// Post-authentication redirect hooks.
pub trait SessionRedirects {
    /// Where to send an admin who just signed in.
    fn after_sign_in_path(&self, admin: &CurrentAdmin) -> &str;

    /// Where to send the browser after signing out.
    fn after_sign_out_path(&self) -> &str;
}

/// Redirects for the admin backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminSessions;

impl SessionRedirects for AdminSessions {
    fn after_sign_in_path(&self, _admin: &CurrentAdmin) -> &str {
        ADMIN_ROOT_PATH
    }

    fn after_sign_out_path(&self) -> &str {
        SIGN_IN_PATH
    }
}

// =============================================================================
// Forms and Templates
// =============================================================================

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Query parameters carrying a sign-in error code.
#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    pub error: Option<String>,
}

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_user/sign_in.html")]
pub struct SignInTemplate {
    pub error: Option<&'static str>,
    pub form_action: &'static str,
}

fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "unauthorized" => "This account does not have access to the admin.",
        _ => "Sign-in failed. Please try again.",
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Build the sessions router.
pub fn router<R: RecordStore + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route(SIGN_IN_PATH, get(sign_in_page).post(sign_in::<R>))
        .route(SIGN_OUT_PATH, post(sign_out))
}

/// Render the sign-in form, or skip it if already signed in.
///
/// GET /admin_user/sign_in
async fn sign_in_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    origin: RequestOrigin,
    Query(query): Query<SignInQuery>,
) -> Response {
    if let Some(admin) = admin {
        return Redirect::to(&origin.url_for(AdminSessions.after_sign_in_path(&admin)))
            .into_response();
    }

    SignInTemplate {
        error: query.error.as_deref().map(error_message),
        form_action: SIGN_IN_PATH,
    }
    .into_response()
}

/// Check credentials and start the admin session.
///
/// POST /admin_user/sign_in
#[tracing::instrument(skip_all)]
async fn sign_in<R: RecordStore + 'static>(
    State(state): State<AppState<R>>,
    session: Session,
    origin: RequestOrigin,
    Form(form): Form<SignInForm>,
) -> Result<Redirect, AppError> {
    let auth = AdminAuthService::new(state.records());

    let admin = match auth.authenticate(&form.email, &form.password).await {
        Ok(admin) => admin,
        Err(AdminAuthError::InvalidCredentials) => {
            tracing::info!("Admin sign-in rejected: invalid credentials");
            return Ok(Redirect::to(&origin.url_for(&format!(
                "{SIGN_IN_PATH}?error=credentials"
            ))));
        }
        Err(AdminAuthError::NotAuthorized) => {
            return Ok(Redirect::to(&origin.url_for(&format!(
                "{SIGN_IN_PATH}?error=unauthorized"
            ))));
        }
        Err(AdminAuthError::Repository(e)) => return Err(e.into()),
    };

    set_current_admin(&session, &admin).await?;
    set_sentry_user(admin.id, Some(admin.email.as_str()));
    tracing::info!(admin_id = %admin.id, "Admin signed in");

    Ok(Redirect::to(
        &origin.url_for(AdminSessions.after_sign_in_path(&admin)),
    ))
}

/// End the admin session.
///
/// POST /admin_user/sign_out
async fn sign_out(session: Session, origin: RequestOrigin) -> Result<Redirect, AppError> {
    clear_current_admin(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to(&origin.url_for(AdminSessions.after_sign_out_path())))
}
