//! `PostgreSQL` implementation of [`RecordStore`].

use sqlx::PgPool;

use storekeep_core::{AdminUserId, Email, RoleId, RoleName, StoreId};

use super::{
    AdminUserRepository, NewStore, RecordStore, RepositoryError, RoleRepository, StoreRepository,
};
use crate::models::{AdminUser, Role, Store};

/// Baseline rows loaded by [`RecordStore::load_defaults`].
const DEFAULTS_SQL: &str = include_str!("../../seeds/defaults.sql");

/// Record storage backed by the `storekeep` schema.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RecordStore for PgRecordStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn load_defaults(&self) -> Result<(), RepositoryError> {
        sqlx::raw_sql(DEFAULTS_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn find_store_by_name(&self, name: &str) -> Result<Option<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).get_by_name(name).await
    }

    async fn create_store(&self, store: &NewStore<'_>) -> Result<Store, RepositoryError> {
        StoreRepository::new(&self.pool).create(store).await
    }

    async fn update_store_contact(
        &self,
        id: StoreId,
        url: &str,
        mail_from_address: &Email,
    ) -> Result<Store, RepositoryError> {
        StoreRepository::new(&self.pool)
            .update_contact(id, url, mail_from_address)
            .await
    }

    async fn find_admin_by_email(&self, email: &Email) -> Result<Option<AdminUser>, RepositoryError> {
        AdminUserRepository::new(&self.pool).get_by_email(email).await
    }

    async fn create_admin(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        AdminUserRepository::new(&self.pool)
            .create(email, password_hash)
            .await
    }

    async fn find_role_by_name(&self, name: &RoleName) -> Result<Option<Role>, RepositoryError> {
        RoleRepository::new(&self.pool).get_by_name(name).await
    }

    async fn create_role(&self, name: &RoleName) -> Result<Role, RepositoryError> {
        RoleRepository::new(&self.pool).create(name).await
    }

    async fn roles_for_admin(&self, admin_id: AdminUserId) -> Result<Vec<Role>, RepositoryError> {
        RoleRepository::new(&self.pool).list_for_admin(admin_id).await
    }

    async fn grant_role(&self, admin_id: AdminUserId, role_id: RoleId) -> Result<(), RepositoryError> {
        RoleRepository::new(&self.pool).grant(admin_id, role_id).await
    }
}
