//! Admin authentication service.
//!
//! Email and password sign-in for the admin backend. An account may only
//! sign in if it holds the `admin` role.

mod error;
pub mod password;

pub use error::{AdminAuthError, PasswordError};
pub use password::{hash_password, validate_password, verify_password};

use storekeep_core::Email;

use crate::db::RecordStore;
use crate::models::CurrentAdmin;

/// Admin authentication service.
pub struct AdminAuthService<'a, R> {
    records: &'a R,
}

impl<'a, R: RecordStore> AdminAuthService<'a, R> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(records: &'a R) -> Self {
        Self { records }
    }

    /// Check credentials and return the identity to store in the session.
    ///
    /// Unparseable emails, unknown emails and wrong passwords are all
    /// reported as `InvalidCredentials`.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AdminAuthError::NotAuthorized` if the account lacks the `admin` role.
    /// Returns `AdminAuthError::Repository` if a lookup fails.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CurrentAdmin, AdminAuthError> {
        let email = Email::parse(email).map_err(|_| AdminAuthError::InvalidCredentials)?;

        let admin = self
            .records
            .find_admin_by_email(&email)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        if !verify_password(password, &admin.password_hash) {
            return Err(AdminAuthError::InvalidCredentials);
        }

        let roles = self.records.roles_for_admin(admin.id).await?;
        if !roles.iter().any(|r| r.name.is_admin()) {
            tracing::warn!(admin_id = %admin.id, "sign-in refused: account lacks admin role");
            return Err(AdminAuthError::NotAuthorized);
        }

        Ok(CurrentAdmin {
            id: admin.id,
            email: admin.email,
        })
    }
}
