use axum::{routing::get, Router};

use service::catalog::repository::{ServiceRepository, VersionRepository};
use service::catalog::CatalogService;

pub mod services;
pub mod versions;

/// Build the catalog router. Every route lives under `/api/v1`.
pub fn build_router<S, V>(catalog: CatalogService<S, V>) -> Router
where
    S: ServiceRepository + 'static,
    V: VersionRepository + 'static,
{
    let api = Router::new()
        .route("/services", get(services::list::<S, V>).post(services::create::<S, V>))
        .route(
            "/services/:id",
            get(services::get::<S, V>).patch(services::update::<S, V>).delete(services::delete::<S, V>),
        )
        .route("/services/:id/versions", get(versions::list::<S, V>).post(versions::create::<S, V>))
        .route(
            "/services/:id/versions/:version_id",
            get(versions::get::<S, V>).patch(versions::update::<S, V>).delete(versions::delete::<S, V>),
        );

    Router::new().nest("/api/v1", api).with_state(catalog)
}
