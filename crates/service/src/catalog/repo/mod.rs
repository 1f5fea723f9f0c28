//! SeaORM-backed repositories.

use std::{future::Future, time::Duration};

use crate::errors::StoreError;

mod services;
mod versions;

pub use services::SeaOrmServiceRepository;
pub use versions::SeaOrmVersionRepository;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Run one store operation under a deadline. An expired deadline drops the
/// future, which rolls back any transaction it had open.
pub(crate) async fn bounded<T, F>(limit: Duration, op: &'static str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => {
            tracing::warn!(op, timeout_ms = limit.as_millis() as u64, "store operation timed out");
            Err(StoreError::Unavailable(format!("{op} timed out after {}ms", limit.as_millis())))
        }
    }
}
