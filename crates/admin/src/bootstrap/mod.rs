//! Deploy-time bootstrap of the store record and the first administrator.
//!
//! [`Seeder::run`] is safe to run on every deploy:
//!
//! 1. Load the backend's baseline data ([`RecordStore::load_defaults`]).
//! 2. Outside production, stop here.
//! 3. Find or create the store by name, then overwrite its URL and sender
//!    address with the configured values.
//! 4. Find or create the administrator by email. An existing account is
//!    never modified, so a changed `ADMIN_PASSWORD` has no effect once the
//!    account exists.
//! 5. Find or create the `admin` role and grant it unless already held.
//!
//! Nothing runs in a transaction: a failure part-way leaves the earlier
//! steps applied, and the next run picks up from there.

mod error;

pub use error::BootstrapError;

use secrecy::{ExposeSecret, SecretString};

use storekeep_core::{CurrencyCode, Email, RoleName};

use crate::config::BootstrapConfig;
use crate::db::{NewStore, RecordStore};
use crate::models::{AdminUser, Role, Store};
use crate::services::auth::{hash_password, validate_password};

/// Whether a find-or-create step found an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyPresent,
}

/// Result of the role-grant step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Granted,
    AlreadyHeld,
}

/// Branches taken by a production run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub store: Store,
    pub store_outcome: Outcome,
    pub admin: AdminUser,
    pub admin_outcome: Outcome,
    pub role_outcome: Outcome,
    pub grant: Grant,
}

/// What a [`Seeder::run`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedReport {
    /// Only the baseline data was loaded (non-production environment).
    DefaultsOnly,
    /// Store and administrator were ensured.
    Seeded(Box<SeedSummary>),
}

/// Idempotent bootstrap procedure.
///
/// The store record is keyed by `STORE_NAME`. Changing that value between
/// runs creates a second store instead of renaming the existing one.
pub struct Seeder<'a, R> {
    records: &'a R,
    config: &'a BootstrapConfig,
}

impl<'a, R: RecordStore> Seeder<'a, R> {
    #[must_use]
    pub const fn new(records: &'a R, config: &'a BootstrapConfig) -> Self {
        Self { records, config }
    }

    /// Run the bootstrap.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::InvalidEmail` if a store or admin address is malformed.
    /// Returns `BootstrapError::Password` if a new admin's password is unacceptable.
    /// Returns `BootstrapError::Repository` if any storage call fails.
    pub async fn run(&self) -> Result<SeedReport, BootstrapError> {
        self.records.load_defaults().await?;
        tracing::info!("Default data loaded");

        if !self.config.environment.is_production() {
            tracing::info!(
                environment = %self.config.environment,
                "Skipping store and admin bootstrap outside production"
            );
            return Ok(SeedReport::DefaultsOnly);
        }

        let store_url = self.config.store_url();
        let store_email = self
            .config
            .store_email()
            .map_err(|source| BootstrapError::InvalidEmail {
                field: "STORE_EMAIL",
                source,
            })?;

        let (store, store_outcome) = self.ensure_store(&store_url, &store_email).await?;

        let admin_email = self
            .config
            .admin_email()
            .map_err(|source| BootstrapError::InvalidEmail {
                field: "ADMIN_EMAIL",
                source,
            })?;
        if self.config.uses_default_admin_password() {
            tracing::warn!("ADMIN_PASSWORD not set, a new admin account would get the default password");
        }
        let (admin, admin_outcome) =
            ensure_admin(self.records, &admin_email, &self.config.admin_password()).await?;

        let (role, role_outcome) = self.ensure_admin_role().await?;
        let grant = self.ensure_grant(&admin, &role).await?;

        Ok(SeedReport::Seeded(Box::new(SeedSummary {
            store,
            store_outcome,
            admin,
            admin_outcome,
            role_outcome,
            grant,
        })))
    }

    async fn ensure_store(
        &self,
        url: &str,
        email: &Email,
    ) -> Result<(Store, Outcome), BootstrapError> {
        let name = self.config.store_name();

        let (store, outcome) = if let Some(store) = self.records.find_store_by_name(name).await? {
            tracing::info!(store_id = %store.id, name, "Store already exists");
            (store, Outcome::AlreadyPresent)
        } else {
            let store = self
                .records
                .create_store(&NewStore {
                    name,
                    default_currency: CurrencyCode::USD,
                })
                .await?;
            tracing::info!(store_id = %store.id, name, "Store created");
            (store, Outcome::Created)
        };

        let store = self
            .records
            .update_store_contact(store.id, url, email)
            .await?;
        tracing::info!(store_id = %store.id, url, mail_from_address = %email, "Store contact updated");

        Ok((store, outcome))
    }

    async fn ensure_admin_role(&self) -> Result<(Role, Outcome), BootstrapError> {
        let name = RoleName::admin();
        if let Some(role) = self.records.find_role_by_name(&name).await? {
            return Ok((role, Outcome::AlreadyPresent));
        }
        let role = self.records.create_role(&name).await?;
        tracing::info!(role_id = %role.id, "Admin role created");
        Ok((role, Outcome::Created))
    }

    async fn ensure_grant(&self, admin: &AdminUser, role: &Role) -> Result<Grant, BootstrapError> {
        let held = self.records.roles_for_admin(admin.id).await?;
        if held.iter().any(|r| r.id == role.id) {
            tracing::info!(admin_id = %admin.id, "Admin already has admin role");
            return Ok(Grant::AlreadyHeld);
        }
        self.records.grant_role(admin.id, role.id).await?;
        tracing::info!(admin_id = %admin.id, "Admin role granted");
        Ok(Grant::Granted)
    }
}

/// Find the administrator by email, creating it with `password` if absent.
///
/// The password is only validated and hashed when an account is created.
/// Roles are not touched.
///
/// # Errors
///
/// Returns `BootstrapError::Password` if a new account's password is unacceptable.
/// Returns `BootstrapError::Repository` if a lookup or insert fails.
pub async fn ensure_admin<R: RecordStore>(
    records: &R,
    email: &Email,
    password: &SecretString,
) -> Result<(AdminUser, Outcome), BootstrapError> {
    if let Some(admin) = records.find_admin_by_email(email).await? {
        tracing::info!(admin_id = %admin.id, email = %admin.email, "Admin user already exists");
        return Ok((admin, Outcome::AlreadyPresent));
    }

    validate_password(password.expose_secret())?;
    let password_hash = hash_password(password.expose_secret())?;
    let admin = records.create_admin(email, &password_hash).await?;
    tracing::info!(admin_id = %admin.id, email = %admin.email, "Admin user created");

    Ok((admin, Outcome::Created))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use storekeep_core::StoreId;

    use super::*;
    use crate::config::Environment;
    use crate::db::{MemoryRecordStore, RepositoryError};
    use crate::services::auth::{PasswordError, verify_password};

    fn production() -> BootstrapConfig {
        BootstrapConfig {
            environment: Environment::Production,
            ..BootstrapConfig::default()
        }
    }

    fn production_on(host: &str) -> BootstrapConfig {
        BootstrapConfig {
            host: Some(host.to_owned()),
            ..production()
        }
    }

    fn summary(report: SeedReport) -> SeedSummary {
        match report {
            SeedReport::Seeded(summary) => *summary,
            SeedReport::DefaultsOnly => panic!("expected a production run"),
        }
    }

    #[tokio::test]
    async fn test_two_runs_yield_one_of_each() {
        let records = MemoryRecordStore::new();
        let config = production_on("shop.example.com");
        let seeder = Seeder::new(&records, &config);

        let first = summary(seeder.run().await.unwrap());
        assert_eq!(first.store_outcome, Outcome::Created);
        assert_eq!(first.admin_outcome, Outcome::Created);
        assert_eq!(first.role_outcome, Outcome::AlreadyPresent);
        assert_eq!(first.grant, Grant::Granted);

        let second = summary(seeder.run().await.unwrap());
        assert_eq!(second.store_outcome, Outcome::AlreadyPresent);
        assert_eq!(second.admin_outcome, Outcome::AlreadyPresent);
        assert_eq!(second.grant, Grant::AlreadyHeld);

        assert_eq!(records.store_count(), 1);
        assert_eq!(records.admin_count(), 1);
        assert_eq!(records.role_count(), 1);
        assert_eq!(records.grant_count(), 1);
    }

    #[tokio::test]
    async fn test_host_derives_url_and_store_email() {
        let records = MemoryRecordStore::new();
        let config = production_on("shop.example.com");

        let seeded = summary(Seeder::new(&records, &config).run().await.unwrap());

        assert_eq!(seeded.store.name, "My Store");
        assert_eq!(seeded.store.url.as_deref(), Some("https://shop.example.com"));
        assert_eq!(
            seeded.store.mail_from_address.unwrap().as_str(),
            "store@shop.example.com"
        );
        assert_eq!(seeded.store.default_currency, CurrencyCode::USD);
        assert_eq!(seeded.admin.email.as_str(), "admin@shop.example.com");
        assert!(verify_password("admin123456", &seeded.admin.password_hash));
    }

    #[tokio::test]
    async fn test_without_host_uses_local_fallbacks() {
        let records = MemoryRecordStore::new();
        let config = production();

        let seeded = summary(Seeder::new(&records, &config).run().await.unwrap());

        assert_eq!(seeded.store.url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(
            seeded.store.mail_from_address.unwrap().as_str(),
            "store@localhost"
        );
        assert_eq!(seeded.admin.email.as_str(), "admin@localhost");
    }

    #[tokio::test]
    async fn test_explicit_values_win() {
        let records = MemoryRecordStore::new();
        let config = BootstrapConfig {
            store_name: Some("Corner Shop".to_owned()),
            store_email: Some("Hello@Corner.example".to_owned()),
            admin_email: Some("owner@corner.example".to_owned()),
            admin_password: Some(SecretString::from("s3cret-pass")),
            ..production_on("corner.example")
        };

        let seeded = summary(Seeder::new(&records, &config).run().await.unwrap());

        assert_eq!(seeded.store.name, "Corner Shop");
        assert_eq!(
            seeded.store.mail_from_address.unwrap().as_str(),
            "hello@corner.example"
        );
        assert_eq!(seeded.admin.email.as_str(), "owner@corner.example");
        assert!(verify_password("s3cret-pass", &seeded.admin.password_hash));
    }

    #[tokio::test]
    async fn test_store_contact_is_overwritten_every_run() {
        let records = MemoryRecordStore::new();
        Seeder::new(&records, &production_on("old.example.com"))
            .run()
            .await
            .unwrap();

        let seeded = summary(
            Seeder::new(&records, &production_on("new.example.com"))
                .run()
                .await
                .unwrap(),
        );

        assert_eq!(seeded.store_outcome, Outcome::AlreadyPresent);
        assert_eq!(seeded.store.url.as_deref(), Some("https://new.example.com"));
        assert_eq!(records.store_count(), 1);
        // The admin email also moved with HOST, so a second account appears.
        assert_eq!(records.admin_count(), 2);
    }

    #[tokio::test]
    async fn test_existing_admin_password_is_never_changed() {
        let records = MemoryRecordStore::new();
        let original_hash = hash_password("original-pass").unwrap();
        let existing =
            records.insert_admin(Email::parse("admin@localhost").unwrap(), &original_hash);

        let config = BootstrapConfig {
            admin_password: Some(SecretString::from("different-pass")),
            ..production()
        };
        let seeded = summary(Seeder::new(&records, &config).run().await.unwrap());

        assert_eq!(seeded.admin_outcome, Outcome::AlreadyPresent);
        assert_eq!(seeded.admin.id, existing.id);
        assert_eq!(seeded.admin.password_hash, original_hash);
        assert_eq!(records.admin_count(), 1);
    }

    #[tokio::test]
    async fn test_existing_admin_without_role_is_granted_once() {
        let records = MemoryRecordStore::new();
        let existing = records.insert_admin(Email::parse("admin@localhost").unwrap(), "hash");
        let config = production();
        let seeder = Seeder::new(&records, &config);

        for _ in 0..3 {
            seeder.run().await.unwrap();
        }

        let role = records
            .find_role_by_name(&RoleName::admin())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(records.grants_between(existing.id, role.id), 1);
    }

    #[tokio::test]
    async fn test_role_is_created_when_defaults_lack_it() {
        let records = MemoryRecordStore::without_defaults();

        let seeded = summary(Seeder::new(&records, &production()).run().await.unwrap());

        assert_eq!(seeded.role_outcome, Outcome::Created);
        assert_eq!(seeded.grant, Grant::Granted);
        assert_eq!(records.role_count(), 1);
    }

    #[tokio::test]
    async fn test_outside_production_only_loads_defaults() {
        let records = MemoryRecordStore::new();
        let config = BootstrapConfig {
            host: Some("shop.example.com".to_owned()),
            ..BootstrapConfig::default()
        };

        let report = Seeder::new(&records, &config).run().await.unwrap();

        assert_eq!(report, SeedReport::DefaultsOnly);
        assert_eq!(records.role_count(), 1);
        assert_eq!(records.store_count(), 0);
        assert_eq!(records.admin_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_store_email_aborts_before_writes() {
        let records = MemoryRecordStore::new();
        let config = BootstrapConfig {
            store_email: Some("not-an-email".to_owned()),
            ..production()
        };

        let err = Seeder::new(&records, &config).run().await.unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::InvalidEmail {
                field: "STORE_EMAIL",
                ..
            }
        ));
        assert_eq!(records.store_count(), 0);
    }

    #[tokio::test]
    async fn test_short_password_rejected_only_on_create() {
        let records = MemoryRecordStore::new();
        let config = BootstrapConfig {
            admin_password: Some(SecretString::from("123")),
            ..production()
        };

        let err = Seeder::new(&records, &config).run().await.unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Password(PasswordError::TooShort { .. })
        ));
        assert_eq!(records.admin_count(), 0);

        let _ = records.insert_admin(Email::parse("admin@localhost").unwrap(), "hash");
        Seeder::new(&records, &config).run().await.unwrap();
    }

    #[tokio::test]
    async fn test_admin_failure_leaves_store_applied() {
        let records = MemoryRecordStore::new().rejecting_admin_inserts();
        let config = production_on("shop.example.com");

        let err = Seeder::new(&records, &config).run().await.unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::Repository(RepositoryError::Database(_))
        ));
        let store = records.find_store_by_name("My Store").await.unwrap().unwrap();
        assert_eq!(store.url.as_deref(), Some("https://shop.example.com"));
        assert_eq!(records.admin_count(), 0);
    }

    #[tokio::test]
    async fn test_existing_store_is_found_by_name() {
        let records = MemoryRecordStore::new();
        let now = Utc::now();
        records.insert_store(Store {
            id: StoreId::new(500),
            name: "My Store".to_owned(),
            url: None,
            default_currency: CurrencyCode::USD,
            mail_from_address: None,
            created_at: now,
            updated_at: now,
        });

        let seeded = summary(Seeder::new(&records, &production()).run().await.unwrap());

        assert_eq!(seeded.store.id, StoreId::new(500));
        assert_eq!(records.store_count(), 1);
    }

    #[tokio::test]
    async fn test_ensure_admin_does_not_grant_roles() {
        let records = MemoryRecordStore::new();
        records.load_defaults().await.unwrap();
        let email = Email::parse("ops@example.com").unwrap();

        let (admin, outcome) = ensure_admin(&records, &email, &SecretString::from("password1"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Created);
        assert!(records.roles_for_admin(admin.id).await.unwrap().is_empty());
    }
}
