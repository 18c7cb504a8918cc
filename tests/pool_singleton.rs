/// Singleton lifecycle tests for the shared connection pool
///
/// These run without a database: the pool is built lazily, so construction
/// never dials PostgreSQL. The whole lifecycle lives in one test because the
/// pool slot is process-wide state shared by every test in this binary.

use matrix_sql_server::db::{self, DbConfig};
use std::sync::Arc;

fn config_for(database: &str) -> DbConfig {
    DbConfig {
        database: database.to_string(),
        ..DbConfig::default()
    }
}

#[tokio::test]
async fn test_singleton_lifecycle() {
    for key in ["DB_USER", "DB_PASSWORD", "DB_HOST", "DB_PORT", "DB_DATABASE", "DB_SSL"] {
        std::env::remove_var(key);
    }

    // First call creates the pool from the supplied configuration.
    let first = db::init_pool(Some(config_for("first_db"))).await;
    assert_eq!(first.connect_options().get_database(), Some("first_db"));

    // Second call ignores its configuration and returns the same pool.
    let again = db::init_pool(Some(config_for("second_db"))).await;
    assert_eq!(again.connect_options().get_database(), Some("first_db"));
    assert!(Arc::ptr_eq(
        &first.connect_options(),
        &again.connect_options()
    ));

    // get_pool observes the same instance.
    let got = db::get_pool().await;
    assert!(Arc::ptr_eq(
        &first.connect_options(),
        &got.connect_options()
    ));

    // Closing drains the pool and clears the slot.
    db::close_pool().await;
    assert!(first.is_closed());
    assert!(again.is_closed());

    // A subsequent access rebuilds a distinct pool from fresh (environment)
    // configuration.
    let rebuilt = db::get_pool().await;
    assert!(!rebuilt.is_closed());
    assert_eq!(rebuilt.connect_options().get_database(), Some("matrix_sql"));
    assert!(!Arc::ptr_eq(
        &first.connect_options(),
        &rebuilt.connect_options()
    ));

    // close_pool is a no-op when called again on an empty slot.
    db::close_pool().await;
    db::close_pool().await;
    assert!(rebuilt.is_closed());
}
