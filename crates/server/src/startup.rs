use std::{future::IntoFuture, sync::Arc, time::Duration};

use axum::Router;
use common::utils::{logging::init_logging_from_env, shutdown::shutdown_signal};
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tokio::{net::TcpListener, sync::Notify};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use service::catalog::repo::{SeaOrmServiceRepository, SeaOrmVersionRepository};
use service::catalog::CatalogService;

/// `config.toml` (or `CONFIG_PATH`) when present, otherwise the environment.
/// A file that exists but does not validate is a hard error.
pub fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) if is_missing_file(&e) => {
            info!("no config file found, using environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
        }
        Err(e) => Err(StartupError::InvalidConfig(e.to_string())),
    }
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

/// Serve until a shutdown signal arrives, then give in-flight requests up to
/// `grace` to finish.
pub async fn serve(listener: TcpListener, app: Router, grace: Duration) -> anyhow::Result<()> {
    let stopping = Arc::new(Notify::new());
    let signal = {
        let stopping = stopping.clone();
        async move {
            shutdown_signal().await;
            stopping.notify_one();
        }
    };
    let server = axum::serve(listener, app).with_graceful_shutdown(signal).into_future();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => res?,
        _ = stopping.notified() => {
            match tokio::time::timeout(grace, &mut server).await {
                Ok(res) => res?,
                Err(_) => warn!(grace_secs = grace.as_secs(), "shutdown grace period elapsed, dropping open connections"),
            }
        }
    }
    Ok(())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;
    let db_cfg = models::db::DatabaseConfig::from(&cfg.database);

    let db = models::db::connect_with_config(&db_cfg).await.map_err(StartupError::from)?;
    migration::Migrator::up(&db, None).await.map_err(StartupError::from)?;
    info!("migrations applied");

    let services = SeaOrmServiceRepository::new(db.clone()).with_query_timeout(db_cfg.query_timeout);
    let versions = SeaOrmVersionRepository::new(db.clone()).with_query_timeout(db_cfg.query_timeout);
    let app = routes::build_router(CatalogService::new(Arc::new(services), Arc::new(versions)));

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    info!(addr = %listener.local_addr()?, "catalog server listening");

    let served = serve(listener, app, Duration::from_secs(cfg.server.shutdown_grace_secs)).await;
    models::db::close(db).await?;
    served
}
