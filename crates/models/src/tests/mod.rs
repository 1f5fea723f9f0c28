/// Schema constraints: uniqueness, foreign keys, defaults
pub mod schema_tests;

/// Transaction commit/rollback behaviour the cascade relies on
pub mod transaction_tests;

/// Pool lifecycle built from the application config
pub mod pool_tests;

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::{connect_with_config, DatabaseConfig};

/// Fresh migrated store. Uses `TEST_DATABASE_URL` when set, otherwise a private
/// in-memory SQLite database (one pinned connection, so never hold a
/// transaction open while querying the pool).
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => DatabaseConfig { url, max_connections: 5, min_connections: 1, ..DatabaseConfig::default() },
        Err(_) => DatabaseConfig::sqlite_memory(),
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub(crate) fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}
