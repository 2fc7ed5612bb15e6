//! Bootstrap the store record and first administrator.
//!
//! # Usage
//!
//! ```bash
//! # Against the database
//! APP_ENV=production HOST=shop.example.com sk-cli seed
//!
//! # Against an empty in-memory store, to preview the outcome
//! APP_ENV=production sk-cli seed --dry-run
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string (not needed with `--dry-run`)
//! - `APP_ENV` - store and admin are only seeded in `production`
//! - `HOST`, `STORE_NAME`, `STORE_EMAIL`, `ADMIN_EMAIL`, `ADMIN_PASSWORD`

use storekeep_admin::bootstrap::{SeedReport, Seeder};
use storekeep_admin::config::BootstrapConfig;
use storekeep_admin::db::{MemoryRecordStore, PgRecordStore, RecordStore};

use super::{CommandError, connect};

/// Run the seeder.
///
/// # Errors
///
/// Returns `CommandError` if configuration is invalid or any seeding step fails.
pub async fn run(dry_run: bool) -> Result<(), CommandError> {
    let config = BootstrapConfig::from_env()?;

    let report = if dry_run {
        tracing::info!("Dry run against an empty in-memory store");
        seed(&MemoryRecordStore::new(), &config).await?
    } else {
        let records = PgRecordStore::new(connect().await?);
        seed(&records, &config).await?
    };

    match report {
        SeedReport::DefaultsOnly => tracing::info!("Seeding complete (defaults only)"),
        SeedReport::Seeded(summary) => tracing::info!(
            store_id = %summary.store.id,
            store = ?summary.store_outcome,
            admin_id = %summary.admin.id,
            admin = ?summary.admin_outcome,
            grant = ?summary.grant,
            "Seeding complete"
        ),
    }
    Ok(())
}

async fn seed<R: RecordStore>(
    records: &R,
    config: &BootstrapConfig,
) -> Result<SeedReport, CommandError> {
    Ok(Seeder::new(records, config).run().await?)
}
