//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `cinelog_test`)
//!   `TEST_DB_PASSWORD` (default: `cinelog_test`)
//!   `TEST_DB_NAME` (default: `cinelog_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use cinelog_db::test_utils::{TestDatabase, TestDbConfig};

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply_cleanly() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    cinelog_db::migrate(db.connection())
        .await
        .expect("Migrations failed");
    db.drop_database().await.expect("Drop failed");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[test]
fn test_config_from_env() {
    // Test that default config is valid
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}
