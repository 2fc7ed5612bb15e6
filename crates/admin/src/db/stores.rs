//! Store repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storekeep_core::{CurrencyCode, Email, StoreId};

use super::{NewStore, RepositoryError, conflict_on_unique};
use crate::models::Store;

const STORE_COLUMNS: &str =
    "id, name, url, default_currency, mail_from_address, created_at, updated_at";

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: i64,
    name: String,
    url: Option<String>,
    default_currency: String,
    mail_from_address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = RepositoryError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let default_currency = CurrencyCode::parse(&row.default_currency).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;
        let mail_from_address = row
            .mail_from_address
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid store email in database: {e}"))
            })?;

        Ok(Self {
            id: StoreId::new(row.id),
            name: row.name,
            url: row.url,
            default_currency,
            mail_from_address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a store by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM storekeep.store WHERE name = $1 ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a store with no URL or sender address yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a store with this name exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, store: &NewStore<'_>) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "INSERT INTO storekeep.store (name, default_currency) VALUES ($1, $2) \
             RETURNING {STORE_COLUMNS}"
        ))
        .bind(store.name)
        .bind(store.default_currency.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "store"))?;

        row.try_into()
    }

    /// Overwrite the URL and sender address of a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_contact(
        &self,
        id: StoreId,
        url: &str,
        mail_from_address: &Email,
    ) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "UPDATE storekeep.store \
             SET url = $2, mail_from_address = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING {STORE_COLUMNS}"
        ))
        .bind(id)
        .bind(url)
        .bind(mail_from_address)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
