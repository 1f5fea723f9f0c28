//! Store handle lifecycle: `connect_with_config` (init + pool limits + ping)
//! → serve → `close`. The resulting `DatabaseConnection` is passed explicitly
//! to repositories; nothing here is process-global.
use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Runtime pool settings, `Duration`-typed counterpart of [`configs::DatabaseConfig`].
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    /// `None` keeps idle connections open indefinitely.
    pub idle_timeout: Option<Duration>,
    /// `None` never recycles a connection by age.
    pub max_lifetime: Option<Duration>,
    pub query_timeout: Duration,
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from(&configs::DatabaseConfig::default())
    }
}

impl From<&configs::DatabaseConfig> for DatabaseConfig {
    fn from(c: &configs::DatabaseConfig) -> Self {
        Self {
            url: c.url.clone(),
            max_connections: c.max_connections,
            min_connections: c.min_connections,
            connect_timeout: Duration::from_secs(c.connect_timeout_secs),
            acquire_timeout: Duration::from_secs(c.acquire_timeout_secs),
            idle_timeout: Some(Duration::from_secs(c.idle_timeout_secs)),
            max_lifetime: Some(Duration::from_secs(c.max_lifetime_secs)),
            query_timeout: Duration::from_secs(c.query_timeout_secs),
            sqlx_logging: c.sqlx_logging,
        }
    }
}

impl DatabaseConfig {
    /// Single pinned connection to a private in-memory SQLite database.
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            idle_timeout: None,
            max_lifetime: None,
            ..Self::default()
        }
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .sqlx_logging(self.sqlx_logging);
        if let Some(idle) = self.idle_timeout {
            opt.idle_timeout(idle);
        }
        if let Some(lifetime) = self.max_lifetime {
            opt.max_lifetime(lifetime);
        }
        opt
    }
}

/// Open a bounded pool and verify it answers before handing it out.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(cfg.connect_options()).await?;
    db.ping().await?;
    info!(
        max_connections = cfg.max_connections,
        min_connections = cfg.min_connections,
        backend = ?db.get_database_backend(),
        "database pool ready"
    );
    Ok(db)
}

/// Drain and close the pool. Consumes the handle so it cannot be reused afterwards.
pub async fn close(db: DatabaseConnection) -> Result<(), DbErr> {
    db.close().await?;
    info!("database pool closed");
    Ok(())
}
