//! The storage operations the seeder and admin sign-in depend on.
//!
//! Every "find or create" is split into a lookup returning `Option` and an
//! explicit create, so idempotency decisions are made at the call site.

use std::future::Future;

use storekeep_core::{AdminUserId, CurrencyCode, Email, RoleId, RoleName, StoreId};

use super::RepositoryError;
use crate::models::{AdminUser, Role, Store};

/// Attributes of a store being created.
#[derive(Debug, Clone)]
pub struct NewStore<'a> {
    pub name: &'a str,
    pub default_currency: CurrencyCode,
}

/// Storage for stores, admin users, roles and role grants.
pub trait RecordStore: Send + Sync {
    /// Check the backend is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Load the backend's own baseline data (reference rows such as roles).
    ///
    /// Must be idempotent. Backends without baseline data do nothing.
    fn load_defaults(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn find_store_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Store>, RepositoryError>> + Send;

    fn create_store(
        &self,
        store: &NewStore<'_>,
    ) -> impl Future<Output = Result<Store, RepositoryError>> + Send;

    /// Overwrite the store's URL and sender address.
    fn update_store_contact(
        &self,
        id: StoreId,
        url: &str,
        mail_from_address: &Email,
    ) -> impl Future<Output = Result<Store, RepositoryError>> + Send;

    fn find_admin_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<AdminUser>, RepositoryError>> + Send;

    fn create_admin(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> impl Future<Output = Result<AdminUser, RepositoryError>> + Send;

    fn find_role_by_name(
        &self,
        name: &RoleName,
    ) -> impl Future<Output = Result<Option<Role>, RepositoryError>> + Send;

    fn create_role(
        &self,
        name: &RoleName,
    ) -> impl Future<Output = Result<Role, RepositoryError>> + Send;

    /// Roles currently granted to the admin.
    fn roles_for_admin(
        &self,
        admin_id: AdminUserId,
    ) -> impl Future<Output = Result<Vec<Role>, RepositoryError>> + Send;

    /// Record a grant. Does not check for an existing identical grant.
    fn grant_role(
        &self,
        admin_id: AdminUserId,
        role_id: RoleId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
