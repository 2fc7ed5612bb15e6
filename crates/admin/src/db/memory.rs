//! In-process [`RecordStore`] used by tests and local dry runs.
//!
//! Mirrors the `PostgreSQL` constraints that matter to callers: admin emails
//! and role names are unique, store names are unique, grants are not.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use storekeep_core::{AdminUserId, Email, RoleId, RoleName, StoreId};

use super::{NewStore, RecordStore, RepositoryError};
use crate::models::{AdminUser, Role, Store};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    stores: Vec<Store>,
    admins: Vec<AdminUser>,
    roles: Vec<Role>,
    grants: Vec<(AdminUserId, RoleId)>,
}

impl Tables {
    const fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Record storage held in memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: Mutex<Tables>,
    default_roles: Vec<RoleName>,
    reject_admin_inserts: bool,
}

impl MemoryRecordStore {
    /// An empty store whose `load_defaults` inserts the `admin` role.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_roles: vec![RoleName::admin()],
            ..Self::default()
        }
    }

    /// An empty store whose `load_defaults` does nothing.
    #[must_use]
    pub fn without_defaults() -> Self {
        Self::default()
    }

    /// Make every `create_admin` call fail with a database error.
    #[must_use]
    pub const fn rejecting_admin_inserts(mut self) -> Self {
        self.reject_admin_inserts = true;
        self
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn store_count(&self) -> usize {
        self.tables().stores.len()
    }

    #[must_use]
    pub fn admin_count(&self) -> usize {
        self.tables().admins.len()
    }

    #[must_use]
    pub fn role_count(&self) -> usize {
        self.tables().roles.len()
    }

    /// Number of grant rows, duplicates included.
    #[must_use]
    pub fn grant_count(&self) -> usize {
        self.tables().grants.len()
    }

    /// Number of grant rows linking this admin to this role.
    #[must_use]
    pub fn grants_between(&self, admin_id: AdminUserId, role_id: RoleId) -> usize {
        self.tables()
            .grants
            .iter()
            .filter(|&&grant| grant == (admin_id, role_id))
            .count()
    }

    /// Insert a store row directly, bypassing seeding.
    pub fn insert_store(&self, store: Store) {
        self.tables().stores.push(store);
    }

    /// Insert an admin row directly, bypassing seeding.
    #[must_use]
    pub fn insert_admin(&self, email: Email, password_hash: &str) -> AdminUser {
        let mut tables = self.tables();
        let now = Utc::now();
        let admin = AdminUser {
            id: AdminUserId::new(tables.next_id()),
            email,
            password_hash: password_hash.to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.admins.push(admin.clone());
        admin
    }
}

impl RecordStore for MemoryRecordStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn load_defaults(&self) -> Result<(), RepositoryError> {
        let mut tables = self.tables();
        for name in &self.default_roles {
            if !tables.roles.iter().any(|r| &r.name == name) {
                let id = RoleId::new(tables.next_id());
                tables.roles.push(Role {
                    id,
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }

    async fn find_store_by_name(&self, name: &str) -> Result<Option<Store>, RepositoryError> {
        Ok(self.tables().stores.iter().find(|s| s.name == name).cloned())
    }

    async fn create_store(&self, store: &NewStore<'_>) -> Result<Store, RepositoryError> {
        let mut tables = self.tables();
        if tables.stores.iter().any(|s| s.name == store.name) {
            return Err(RepositoryError::Conflict("store already exists".to_owned()));
        }
        let now = Utc::now();
        let created = Store {
            id: StoreId::new(tables.next_id()),
            name: store.name.to_owned(),
            url: None,
            default_currency: store.default_currency,
            mail_from_address: None,
            created_at: now,
            updated_at: now,
        };
        tables.stores.push(created.clone());
        Ok(created)
    }

    async fn update_store_contact(
        &self,
        id: StoreId,
        url: &str,
        mail_from_address: &Email,
    ) -> Result<Store, RepositoryError> {
        let mut tables = self.tables();
        let store = tables
            .stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepositoryError::NotFound)?;
        store.url = Some(url.to_owned());
        store.mail_from_address = Some(mail_from_address.clone());
        store.updated_at = Utc::now();
        Ok(store.clone())
    }

    async fn find_admin_by_email(&self, email: &Email) -> Result<Option<AdminUser>, RepositoryError> {
        Ok(self
            .tables()
            .admins
            .iter()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn create_admin(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        if self.reject_admin_inserts {
            return Err(RepositoryError::Database(sqlx::Error::Protocol(
                "admin inserts rejected".to_owned(),
            )));
        }
        if self.tables().admins.iter().any(|a| &a.email == email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        Ok(self.insert_admin(email.clone(), password_hash))
    }

    async fn find_role_by_name(&self, name: &RoleName) -> Result<Option<Role>, RepositoryError> {
        Ok(self
            .tables()
            .roles
            .iter()
            .find(|r| &r.name == name)
            .cloned())
    }

    async fn create_role(&self, name: &RoleName) -> Result<Role, RepositoryError> {
        let mut tables = self.tables();
        if tables.roles.iter().any(|r| &r.name == name) {
            return Err(RepositoryError::Conflict("role already exists".to_owned()));
        }
        let role = Role {
            id: RoleId::new(tables.next_id()),
            name: name.clone(),
        };
        tables.roles.push(role.clone());
        Ok(role)
    }

    async fn roles_for_admin(&self, admin_id: AdminUserId) -> Result<Vec<Role>, RepositoryError> {
        let tables = self.tables();
        Ok(tables
            .roles
            .iter()
            .filter(|r| tables.grants.contains(&(admin_id, r.id)))
            .cloned()
            .collect())
    }

    async fn grant_role(&self, admin_id: AdminUserId, role_id: RoleId) -> Result<(), RepositoryError> {
        let mut tables = self.tables();
        if !tables.admins.iter().any(|a| a.id == admin_id)
            || !tables.roles.iter().any(|r| r.id == role_id)
        {
            return Err(RepositoryError::NotFound);
        }
        tables.grants.push((admin_id, role_id));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storekeep_core::CurrencyCode;

    use super::*;

    #[tokio::test]
    async fn test_load_defaults_is_idempotent() {
        let records = MemoryRecordStore::new();
        records.load_defaults().await.unwrap();
        records.load_defaults().await.unwrap();
        assert_eq!(records.role_count(), 1);
        assert!(
            records
                .find_role_by_name(&RoleName::admin())
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_without_defaults_loads_nothing() {
        let records = MemoryRecordStore::without_defaults();
        records.load_defaults().await.unwrap();
        assert_eq!(records.role_count(), 0);
    }

    #[tokio::test]
    async fn test_admin_email_is_unique() {
        let records = MemoryRecordStore::new();
        let email = Email::parse("a@example.com").unwrap();
        records.create_admin(&email, "hash").await.unwrap();
        let err = records.create_admin(&email, "hash").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_grants_allow_duplicates() {
        let records = MemoryRecordStore::new();
        records.load_defaults().await.unwrap();
        let admin = records.insert_admin(Email::parse("a@example.com").unwrap(), "hash");
        let role = records
            .find_role_by_name(&RoleName::admin())
            .await
            .unwrap()
            .unwrap();

        records.grant_role(admin.id, role.id).await.unwrap();
        records.grant_role(admin.id, role.id).await.unwrap();

        assert_eq!(records.grants_between(admin.id, role.id), 2);
        assert_eq!(records.roles_for_admin(admin.id).await.unwrap(), vec![role]);
    }

    #[tokio::test]
    async fn test_update_contact_on_missing_store() {
        let records = MemoryRecordStore::new();
        let email = Email::parse("store@example.com").unwrap();
        let err = records
            .update_store_contact(StoreId::new(99), "https://example.com", &email)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_create_store_starts_without_contact() {
        let records = MemoryRecordStore::new();
        let store = records
            .create_store(&NewStore {
                name: "My Store",
                default_currency: CurrencyCode::USD,
            })
            .await
            .unwrap();
        assert!(store.url.is_none());
        assert!(store.mail_from_address.is_none());
        assert_eq!(records.store_count(), 1);
    }
}
