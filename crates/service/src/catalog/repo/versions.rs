use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use models::version;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::info;

use super::{bounded, DEFAULT_QUERY_TIMEOUT};
use crate::catalog::domain::{NewVersion, Version, VersionPatch};
use crate::catalog::repository::VersionRepository;
use crate::errors::StoreError;

#[derive(Clone)]
pub struct SeaOrmVersionRepository {
    db: DatabaseConnection,
    query_timeout: Duration,
}

impl SeaOrmVersionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, query_timeout: DEFAULT_QUERY_TIMEOUT }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

/// A version only matches when it belongs to the given service.
fn scoped(id: i32, service_id: i32) -> sea_orm::Select<version::Entity> {
    version::Entity::find_by_id(id).filter(version::Column::ServiceId.eq(service_id))
}

#[async_trait]
impl VersionRepository for SeaOrmVersionRepository {
    async fn create(&self, service_id: i32, input: NewVersion) -> Result<Version, StoreError> {
        bounded(self.query_timeout, "version.create", async {
            let am = version::new_active_model(service_id, &input.version, &input.description, input.is_active)?;
            let created = am.insert(&self.db).await?;
            info!(service_id, version_id = created.id, version = %created.version, "version created");
            Ok(created)
        })
        .await
    }

    async fn get(&self, id: i32, service_id: i32) -> Result<Version, StoreError> {
        bounded(self.query_timeout, "version.get", async {
            scoped(id, service_id).one(&self.db).await?.ok_or(StoreError::NotFound)
        })
        .await
    }

    async fn update(&self, id: i32, service_id: i32, patch: VersionPatch) -> Result<Version, StoreError> {
        bounded(self.query_timeout, "version.update", async {
            if let Some(label) = &patch.version {
                version::validate_label(label)?;
            }
            let txn = self.db.begin().await?;
            let existing = scoped(id, service_id).one(&txn).await?.ok_or(StoreError::NotFound)?;
            let mut am: version::ActiveModel = existing.into();
            if let Some(label) = patch.version {
                am.version = Set(label.trim().to_string());
            }
            if let Some(description) = patch.description {
                am.description = Set(description);
            }
            if let Some(active) = patch.is_active {
                am.is_active = Set(active);
            }
            am.updated_at = Set(Utc::now().into());
            let updated = am.update(&txn).await?;
            txn.commit().await?;
            Ok(updated)
        })
        .await
    }

    async fn delete(&self, id: i32, service_id: i32) -> Result<(), StoreError> {
        bounded(self.query_timeout, "version.delete", async {
            let res = version::Entity::delete_many()
                .filter(version::Column::Id.eq(id))
                .filter(version::Column::ServiceId.eq(service_id))
                .exec(&self.db)
                .await?;
            if res.rows_affected == 0 {
                return Err(StoreError::NotFound);
            }
            info!(service_id, version_id = id, "version deleted");
            Ok(())
        })
        .await
    }
}
