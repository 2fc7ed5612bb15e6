//! Seeder runs configured the way `sk-cli seed` configures them.

use storekeep_admin::bootstrap::{Grant, Outcome, SeedReport, Seeder};
use storekeep_admin::config::BootstrapConfig;
use storekeep_admin::db::{MemoryRecordStore, RecordStore};
use storekeep_admin::services::auth::verify_password;
use storekeep_core::{Email, RoleName};
use storekeep_integration_tests::vars;

fn config(pairs: &[(&str, &str)]) -> BootstrapConfig {
    BootstrapConfig::from_vars(vars(pairs)).unwrap()
}

#[tokio::test]
async fn test_repeated_deploys_converge() {
    let records = MemoryRecordStore::new();
    let config = config(&[("APP_ENV", "production"), ("HOST", "shop.example.com")]);

    for _ in 0..3 {
        Seeder::new(&records, &config).run().await.unwrap();
    }

    assert_eq!(records.store_count(), 1);
    assert_eq!(records.admin_count(), 1);
    assert_eq!(records.role_count(), 1);
    assert_eq!(records.grant_count(), 1);
}

#[tokio::test]
async fn test_host_only_configuration() {
    let records = MemoryRecordStore::new();
    let config = config(&[
        ("APP_ENV", "production"),
        ("HOST", "shop.example.com"),
        ("STORE_NAME", "   "),
    ]);

    let SeedReport::Seeded(summary) = Seeder::new(&records, &config).run().await.unwrap() else {
        panic!("expected a production run");
    };

    assert_eq!(summary.store.name, "My Store");
    assert_eq!(
        summary.store.url.as_deref(),
        Some("https://shop.example.com")
    );
    assert_eq!(
        summary.store.mail_from_address.map(String::from).as_deref(),
        Some("store@shop.example.com")
    );
}

#[tokio::test]
async fn test_changed_admin_password_is_ignored_after_creation() {
    let records = MemoryRecordStore::new();

    Seeder::new(
        &records,
        &config(&[("APP_ENV", "production"), ("ADMIN_PASSWORD", "first-password")]),
    )
    .run()
    .await
    .unwrap();

    let SeedReport::Seeded(summary) = Seeder::new(
        &records,
        &config(&[("APP_ENV", "production"), ("ADMIN_PASSWORD", "second-password")]),
    )
    .run()
    .await
    .unwrap() else {
        panic!("expected a production run");
    };

    assert_eq!(summary.admin_outcome, Outcome::AlreadyPresent);
    assert_eq!(summary.grant, Grant::AlreadyHeld);
    assert!(verify_password("first-password", &summary.admin.password_hash));
    assert!(!verify_password("second-password", &summary.admin.password_hash));
}

#[tokio::test]
async fn test_admin_password_is_hashed_verbatim() {
    let records = MemoryRecordStore::new();
    let config = config(&[("APP_ENV", "production"), ("ADMIN_PASSWORD", " pass phrase ")]);

    let SeedReport::Seeded(summary) = Seeder::new(&records, &config).run().await.unwrap() else {
        panic!("expected a production run");
    };

    assert!(verify_password(" pass phrase ", &summary.admin.password_hash));
    assert!(!verify_password("pass phrase", &summary.admin.password_hash));
}

#[tokio::test]
async fn test_preexisting_admin_gets_role_exactly_once() {
    let records = MemoryRecordStore::new();
    let admin = records.insert_admin(Email::parse("admin@localhost").unwrap(), "hash");
    let config = config(&[("APP_ENV", "production")]);

    for _ in 0..2 {
        Seeder::new(&records, &config).run().await.unwrap();
    }

    let role = records
        .find_role_by_name(&RoleName::admin())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(records.grants_between(admin.id, role.id), 1);
}

#[tokio::test]
async fn test_development_skips_store_and_admin() {
    let records = MemoryRecordStore::new();

    let report = Seeder::new(&records, &config(&[("HOST", "shop.example.com")]))
        .run()
        .await
        .unwrap();

    assert_eq!(report, SeedReport::DefaultsOnly);
    assert_eq!(records.store_count(), 0);
    assert_eq!(records.admin_count(), 0);
}
