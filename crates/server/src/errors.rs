use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::catalog::CatalogError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body: `{ "code", "message", "details"? }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl JsonApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>, details: Option<String>) -> Self {
        Self { status, body: ErrorBody { code, message: message.into(), details } }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>, details: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message, details)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<CatalogError> for JsonApiError {
    fn from(err: CatalogError) -> Self {
        let status = match &err {
            CatalogError::ServiceNotFound(_) | CatalogError::VersionNotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::Invalid(_) => StatusCode::BAD_REQUEST,
            CatalogError::Conflict(_) => StatusCode::CONFLICT,
            CatalogError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &err {
            CatalogError::Store(e) => error!(error = %e, "catalog store failure"),
            CatalogError::Unavailable(msg) => warn!(error = %msg, "catalog store unavailable"),
            _ => {}
        }
        let message = match &err {
            CatalogError::Store(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        let details = match &err {
            CatalogError::Conflict(m) | CatalogError::Invalid(m) => Some(m.clone()),
            _ => None,
        };
        JsonApiError::new(status, err.code(), message, details)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
