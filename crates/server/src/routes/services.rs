use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use service::catalog::domain::{NewService, ServiceDetail, ServiceFilter, ServicePatch, ServiceResponse, ServiceSummary};
use service::catalog::repository::{ServiceRepository, VersionRepository};
use service::catalog::CatalogService;

use crate::errors::JsonApiError;

/// Raw list query. Everything is a string so a bad number falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn into_filter(self) -> ServiceFilter {
        let number = |raw: Option<String>| raw.and_then(|s| s.trim().parse::<i64>().ok());
        let page = number(self.page);
        let limit = number(self.limit);
        ServiceFilter::from_raw(self.name, self.description, self.sort.as_deref(), self.order.as_deref(), page, limit)
    }
}

pub(crate) fn parse_service_id(raw: &str) -> Result<i32, JsonApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|e| JsonApiError::bad_request("invalid_service_id", "Invalid service ID", Some(e.to_string())))
}

pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| JsonApiError::bad_request("invalid_request_body", "Invalid request body", Some(e.body_text())))
}

pub async fn list<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ServiceResponse>, JsonApiError> {
    let res = catalog.list_services(q.into_filter()).await?;
    Ok(Json(res))
}

pub async fn create<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    payload: Result<Json<NewService>, JsonRejection>,
) -> Result<(StatusCode, Json<ServiceSummary>), JsonApiError> {
    let input = body(payload)?;
    let created = catalog.create_service(input).await?;
    info!(service_id = created.id, "create_service_request");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceDetail>, JsonApiError> {
    let id = parse_service_id(&id)?;
    Ok(Json(catalog.get_service(id).await?))
}

pub async fn update<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    Path(id): Path<String>,
    payload: Result<Json<ServicePatch>, JsonRejection>,
) -> Result<Json<ServiceSummary>, JsonApiError> {
    let id = parse_service_id(&id)?;
    let patch = body(payload)?;
    Ok(Json(catalog.update_service(id, patch).await?))
}

pub async fn delete<S: ServiceRepository, V: VersionRepository>(
    State(catalog): State<CatalogService<S, V>>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    let id = parse_service_id(&id)?;
    catalog.delete_service(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
