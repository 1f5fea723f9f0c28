use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Storage-level failures surfaced by the repositories.
///
/// Known conditions get their own kind; anything else from the driver is
/// carried through untouched in [`StoreError::Db`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid record: {0}")]
    Invalid(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("database error: {0}")]
    Db(#[source] DbErr),
}

impl StoreError {
    /// Only transient store conditions are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => return StoreError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return StoreError::Invalid(msg),
            _ => {}
        }
        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => StoreError::NotFound,
            DbErr::ConnectionAcquire(e) => StoreError::Unavailable(e.to_string()),
            DbErr::Conn(e) => StoreError::Unavailable(e.to_string()),
            other => StoreError::Db(other),
        }
    }
}

impl From<models::errors::ModelError> for StoreError {
    fn from(err: models::errors::ModelError) -> Self {
        match err {
            models::errors::ModelError::Validation(msg) => StoreError::Invalid(msg),
        }
    }
}
