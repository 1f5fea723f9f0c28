use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use service::catalog::domain::{NewVersion, Version, VersionPatch};
use service::catalog::repository::{ServiceRepository, VersionRepository};
use service::catalog::CatalogService;

use super::services::{body, parse_service_id};
use crate::errors::JsonApiError;

fn parse_ids(service_id: &str, version_id: &str) -> Result<(i32, i32), JsonApiError> {
    let service_id = parse_service_id(service_id)?;
    let version_id = version_id
        .trim()
        .parse::<i32>()
        .map_err(|e| JsonApiError::bad_request("invalid_version_id", "Invalid version ID", Some(e.to_string())))?;
    Ok((service_id, version_id))
}

pub async fn list<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Version>>, JsonApiError> {
    let id = parse_service_id(&id)?;
    Ok(Json(catalog.get_service_versions(id).await?))
}

pub async fn create<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    Path(id): Path<String>,
    payload: Result<Json<NewVersion>, JsonRejection>,
) -> Result<(StatusCode, Json<Version>), JsonApiError> {
    let id = parse_service_id(&id)?;
    let input = body(payload)?;
    let created = catalog.create_version(id, input).await?;
    info!(service_id = id, version_id = created.id, "create_version_request");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    Path((id, version_id)): Path<(String, String)>,
) -> Result<Json<Version>, JsonApiError> {
    let (id, version_id) = parse_ids(&id, &version_id)?;
    Ok(Json(catalog.get_service_version(id, version_id).await?))
}

pub async fn update<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    Path((id, version_id)): Path<(String, String)>,
    payload: Result<Json<VersionPatch>, JsonRejection>,
) -> Result<Json<Version>, JsonApiError> {
    let (id, version_id) = parse_ids(&id, &version_id)?;
    let patch = body(payload)?;
    Ok(Json(catalog.update_version(id, version_id, patch).await?))
}

pub async fn delete<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    Path((id, version_id)): Path<(String, String)>,
) -> Result<StatusCode, JsonApiError> {
    let (id, version_id) = parse_ids(&id, &version_id)?;
    catalog.delete_version(id, version_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
