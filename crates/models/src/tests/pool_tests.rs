use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectionTrait, DbBackend};

use crate::db::{close, connect_with_config, DatabaseConfig};

#[test]
fn test_runtime_config_follows_app_config() {
    let app = configs::DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        query_timeout_secs: 3,
        ..Default::default()
    };
    let cfg = DatabaseConfig::from(&app);
    assert_eq!(cfg.url, "sqlite::memory:");
    assert_eq!(cfg.max_connections, 1);
    assert_eq!(cfg.query_timeout, Duration::from_secs(3));
    assert_eq!(cfg.idle_timeout, Some(Duration::from_secs(app.idle_timeout_secs)));
}

#[tokio::test]
async fn test_connect_then_close() -> Result<()> {
    let app = configs::DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = connect_with_config(&DatabaseConfig::from(&app)).await?;
    assert_eq!(db.get_database_backend(), DbBackend::Sqlite);
    close(db).await?;
    Ok(())
}

