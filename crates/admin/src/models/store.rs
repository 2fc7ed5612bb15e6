//! Store domain type.

use chrono::{DateTime, Utc};

use storekeep_core::{CurrencyCode, Email, StoreId};

/// The canonical commerce-site record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub id: StoreId,
    /// Lookup key used by the bootstrap seeder.
    pub name: String,
    /// Canonical storefront URL; unset until the first production bootstrap.
    pub url: Option<String>,
    pub default_currency: CurrencyCode,
    /// Sender address for outbound store mail.
    pub mail_from_address: Option<Email>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
