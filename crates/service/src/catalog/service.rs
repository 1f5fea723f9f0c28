use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{
    NewService, NewVersion, ServiceDetail, ServiceFilter, ServicePatch, ServiceResponse, ServiceSummary, Version,
    VersionPatch,
};
use super::errors::CatalogError;
use super::repository::{ServiceRepository, VersionRepository};
use crate::pagination::Pagination;

/// Catalog business service independent of web framework
pub struct CatalogService<S: ServiceRepository, V: VersionRepository> {
    services: Arc<S>,
    versions: Arc<V>,
}

impl<S: ServiceRepository, V: VersionRepository> Clone for CatalogService<S, V> {
    fn clone(&self) -> Self {
        Self { services: self.services.clone(), versions: self.versions.clone() }
    }
}

impl<S: ServiceRepository, V: VersionRepository> CatalogService<S, V> {
    pub fn new(services: Arc<S>, versions: Arc<V>) -> Self { Self { services, versions } }

    /// List one page of services with pagination metadata.
    ///
    /// # Examples
    /// ```
    /// use service::catalog::{CatalogService, repository::mock::InMemoryCatalog};
    /// use service::catalog::domain::{NewService, ServiceFilter};
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryCatalog::new());
    /// let svc = CatalogService::new(repo.clone(), repo);
    /// tokio_test::block_on(svc.create_service(NewService { name: "Auth".into(), description: String::new() })).unwrap();
    /// let page = tokio_test::block_on(svc.list_services(ServiceFilter::default())).unwrap();
    /// assert_eq!(page.services.len(), 1);
    /// assert_eq!(page.pagination.total_items, 1);
    /// ```
    #[instrument(skip(self, filter), fields(sort = filter.sort.as_str(), order = filter.order.as_str(), page = filter.page.page, limit = filter.page.limit))]
    pub async fn list_services(&self, filter: ServiceFilter) -> Result<ServiceResponse, CatalogError> {
        let (services, total) = self.services.list(&filter).await?;
        let pagination = Pagination::new(filter.page, total);
        Ok(ServiceResponse { services, pagination })
    }

    #[instrument(skip(self))]
    pub async fn get_service(&self, id: i32) -> Result<ServiceDetail, CatalogError> {
        self.services
            .get(id)
            .await
            .map_err(|e| CatalogError::from_store(e, CatalogError::ServiceNotFound(id)))
    }

    /// Versions of a service, newest first. A missing service is an error,
    /// not an empty list.
    #[instrument(skip(self))]
    pub async fn get_service_versions(&self, service_id: i32) -> Result<Vec<Version>, CatalogError> {
        self.ensure_service(service_id).await?;
        Ok(self.services.list_versions(service_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_service_version(&self, service_id: i32, version_id: i32) -> Result<Version, CatalogError> {
        self.ensure_service(service_id).await?;
        self.get_version(service_id, version_id).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_service(&self, input: NewService) -> Result<ServiceSummary, CatalogError> {
        let created = self.services.create(input).await?;
        info!(service_id = created.id, name = %created.name, "service_created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_service(&self, id: i32, patch: ServicePatch) -> Result<ServiceSummary, CatalogError> {
        if patch.is_empty() {
            debug!(service_id = id, "empty patch only refreshes updated_at");
        }
        let updated = self
            .services
            .update(id, patch)
            .await
            .map_err(|e| CatalogError::from_store(e, CatalogError::ServiceNotFound(id)))?;
        info!(service_id = id, "service_updated");
        Ok(updated)
    }

    /// Delete a service together with all of its versions.
    ///
    /// # Examples
    /// ```
    /// use service::catalog::{CatalogService, CatalogError, repository::mock::InMemoryCatalog};
    /// use service::catalog::domain::{NewService, NewVersion};
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryCatalog::new());
    /// let svc = CatalogService::new(repo.clone(), repo.clone());
    /// let s = tokio_test::block_on(svc.create_service(NewService { name: "Auth".into(), description: String::new() })).unwrap();
    /// let v = NewVersion { version: "1.0.0".into(), description: String::new(), is_active: true };
    /// tokio_test::block_on(svc.create_version(s.id, v)).unwrap();
    /// tokio_test::block_on(svc.delete_service(s.id)).unwrap();
    /// assert_eq!(repo.version_count(), 0);
    /// let err = tokio_test::block_on(svc.get_service(s.id)).unwrap_err();
    /// assert!(matches!(err, CatalogError::ServiceNotFound(_)));
    /// ```
    #[instrument(skip(self))]
    pub async fn delete_service(&self, id: i32) -> Result<(), CatalogError> {
        self.services
            .delete(id)
            .await
            .map_err(|e| CatalogError::from_store(e, CatalogError::ServiceNotFound(id)))?;
        info!(service_id = id, "service_deleted");
        Ok(())
    }

    #[instrument(skip(self, input), fields(version = %input.version))]
    pub async fn create_version(&self, service_id: i32, input: NewVersion) -> Result<Version, CatalogError> {
        self.ensure_service(service_id).await?;
        let created = self.versions.create(service_id, input).await.map_err(|e| {
            if let crate::errors::StoreError::Invalid(msg) = &e {
                warn!(service_id, error = %msg, "version insert rejected by store");
            }
            CatalogError::from(e)
        })?;
        info!(service_id, version_id = created.id, "version_created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_version(&self, service_id: i32, version_id: i32) -> Result<Version, CatalogError> {
        self.versions
            .get(version_id, service_id)
            .await
            .map_err(|e| CatalogError::from_store(e, CatalogError::VersionNotFound { service_id, version_id }))
    }

    #[instrument(skip(self, patch))]
    pub async fn update_version(
        &self,
        service_id: i32,
        version_id: i32,
        patch: VersionPatch,
    ) -> Result<Version, CatalogError> {
        if patch.is_empty() {
            debug!(service_id, version_id, "empty patch only refreshes updated_at");
        }
        let updated = self
            .versions
            .update(version_id, service_id, patch)
            .await
            .map_err(|e| CatalogError::from_store(e, CatalogError::VersionNotFound { service_id, version_id }))?;
        info!(service_id, version_id, "version_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_version(&self, service_id: i32, version_id: i32) -> Result<(), CatalogError> {
        self.versions
            .delete(version_id, service_id)
            .await
            .map_err(|e| CatalogError::from_store(e, CatalogError::VersionNotFound { service_id, version_id }))?;
        info!(service_id, version_id, "version_deleted");
        Ok(())
    }

    async fn ensure_service(&self, service_id: i32) -> Result<(), CatalogError> {
        if self.services.exists(service_id).await? {
            Ok(())
        } else {
            Err(CatalogError::ServiceNotFound(service_id))
        }
    }
}
