use thiserror::Error;

use crate::errors::StoreError;

/// Business errors exposed by [`super::CatalogService`].
///
/// Storage-level `NotFound` never leaks upward; it is resolved into the
/// entity that was actually missing.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("service {0} not found")]
    ServiceNotFound(i32),
    #[error("version {version_id} not found for service {service_id}")]
    VersionNotFound { service_id: i32, version_id: i32 },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Store(StoreError),
}

impl CatalogError {
    /// Stable machine-readable code for external mapping/logging
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::ServiceNotFound(_) => "service_not_found",
            CatalogError::VersionNotFound { .. } => "version_not_found",
            CatalogError::Conflict(_) => "conflict",
            CatalogError::Invalid(_) => "invalid",
            CatalogError::Unavailable(_) => "unavailable",
            CatalogError::Store(_) => "internal_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::ServiceNotFound(_) | CatalogError::VersionNotFound { .. })
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Unavailable(_))
    }

    /// Translate a store error, resolving `NotFound` to the given domain error.
    pub(crate) fn from_store(err: StoreError, not_found: CatalogError) -> Self {
        match err {
            StoreError::NotFound => not_found,
            other => other.into(),
        }
    }
}

/// Kinds that read the same at both layers. A bare `NotFound` with no
/// entity context is treated as an internal error rather than guessed at.
impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(m) => CatalogError::Conflict(m),
            StoreError::Invalid(m) => CatalogError::Invalid(m),
            StoreError::Unavailable(m) => CatalogError::Unavailable(m),
            other => CatalogError::Store(other),
        }
    }
}
