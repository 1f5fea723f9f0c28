use async_trait::async_trait;

use super::domain::{
    NewService, NewVersion, ServiceDetail, ServiceFilter, ServicePatch, ServiceSummary, Version, VersionPatch,
};
use crate::errors::StoreError;

/// Data access for services. Implementations own the cascade on delete.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// One page of matching services and the total match count before paging.
    async fn list(&self, filter: &ServiceFilter) -> Result<(Vec<ServiceSummary>, u64), StoreError>;
    async fn get(&self, id: i32) -> Result<ServiceDetail, StoreError>;
    async fn exists(&self, id: i32) -> Result<bool, StoreError>;
    /// Versions owned by `service_id`, newest first.
    async fn list_versions(&self, service_id: i32) -> Result<Vec<Version>, StoreError>;
    async fn create(&self, input: NewService) -> Result<ServiceSummary, StoreError>;
    async fn update(&self, id: i32, patch: ServicePatch) -> Result<ServiceSummary, StoreError>;
    /// Removes the service and every version it owns, or nothing at all.
    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}

/// Data access for versions. Every lookup is scoped by the owning service.
#[async_trait]
pub trait VersionRepository: Send + Sync {
    async fn create(&self, service_id: i32, input: NewVersion) -> Result<Version, StoreError>;
    async fn get(&self, id: i32, service_id: i32) -> Result<Version, StoreError>;
    async fn update(&self, id: i32, service_id: i32, patch: VersionPatch) -> Result<Version, StoreError>;
    async fn delete(&self, id: i32, service_id: i32) -> Result<(), StoreError>;
}

/// In-memory repository double for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::Utc;
    use models::{service, version};

    use crate::catalog::domain::{SortColumn, SortOrder};

    #[derive(Default)]
    struct State {
        next_service_id: i32,
        next_version_id: i32,
        services: BTreeMap<i32, service::Model>,
        versions: BTreeMap<i32, version::Model>,
    }

    impl State {
        fn count_for(&self, service_id: i32) -> u64 {
            self.versions.values().filter(|v| v.service_id == service_id).count() as u64
        }

        fn versions_of(&self, service_id: i32) -> Vec<version::Model> {
            let mut out: Vec<_> = self.versions.values().filter(|v| v.service_id == service_id).cloned().collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            out
        }
    }

    /// Implements both repository traits over one shared state, so version
    /// counts and cascades behave like the real store.
    #[derive(Default)]
    pub struct InMemoryCatalog {
        state: Mutex<State>,
        fail_next: Mutex<Option<StoreError>>,
    }

    impl InMemoryCatalog {
        pub fn new() -> Self { Self::default() }

        /// Make the next repository call fail with `err`.
        pub fn fail_next(&self, err: StoreError) {
            *self.fail_next.lock().unwrap() = Some(err);
        }

        pub fn service_count(&self) -> usize { self.state.lock().unwrap().services.len() }

        pub fn version_count(&self) -> usize { self.state.lock().unwrap().versions.len() }

        fn injected(&self) -> Result<(), StoreError> {
            match self.fail_next.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    fn contains_ci(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }

    #[async_trait]
    impl ServiceRepository for InMemoryCatalog {
        async fn list(&self, filter: &ServiceFilter) -> Result<(Vec<ServiceSummary>, u64), StoreError> {
            self.injected()?;
            let state = self.state.lock().unwrap();
            let mut matched: Vec<&service::Model> = state
                .services
                .values()
                .filter(|s| filter.name_term().map_or(true, |t| contains_ci(&s.name, t)))
                .filter(|s| filter.description_term().map_or(true, |t| contains_ci(&s.description, t)))
                .collect();
            matched.sort_by(|a, b| {
                let ord = match filter.sort {
                    SortColumn::Name => a.name.cmp(&b.name),
                    SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
                    SortColumn::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                };
                let ord = match filter.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                };
                ord.then(a.id.cmp(&b.id))
            });
            let total = matched.len() as u64;
            let items = matched
                .into_iter()
                .skip(filter.page.offset() as usize)
                .take(filter.page.limit as usize)
                .map(|s| ServiceSummary::from_model(s.clone(), state.count_for(s.id)))
                .collect();
            Ok((items, total))
        }

        async fn get(&self, id: i32) -> Result<ServiceDetail, StoreError> {
            self.injected()?;
            let state = self.state.lock().unwrap();
            let svc = state.services.get(&id).cloned().ok_or(StoreError::NotFound)?;
            Ok(ServiceDetail::from_model(svc, state.versions_of(id)))
        }

        async fn exists(&self, id: i32) -> Result<bool, StoreError> {
            self.injected()?;
            Ok(self.state.lock().unwrap().services.contains_key(&id))
        }

        async fn list_versions(&self, service_id: i32) -> Result<Vec<Version>, StoreError> {
            self.injected()?;
            Ok(self.state.lock().unwrap().versions_of(service_id))
        }

        async fn create(&self, input: NewService) -> Result<ServiceSummary, StoreError> {
            self.injected()?;
            service::validate_name(&input.name)?;
            let mut state = self.state.lock().unwrap();
            let name = input.name.trim().to_string();
            if state.services.values().any(|s| s.name == name) {
                return Err(StoreError::Conflict(format!("service name '{name}' already exists")));
            }
            state.next_service_id += 1;
            let now = Utc::now().into();
            let model = service::Model {
                id: state.next_service_id,
                name,
                description: input.description,
                created_at: now,
                updated_at: now,
            };
            state.services.insert(model.id, model.clone());
            Ok(ServiceSummary::from_model(model, 0))
        }

        async fn update(&self, id: i32, patch: ServicePatch) -> Result<ServiceSummary, StoreError> {
            self.injected()?;
            if let Some(name) = &patch.name {
                service::validate_name(name)?;
            }
            let mut state = self.state.lock().unwrap();
            if !state.services.contains_key(&id) {
                return Err(StoreError::NotFound);
            }
            if let Some(name) = &patch.name {
                let name = name.trim();
                if state.services.values().any(|s| s.id != id && s.name == name) {
                    return Err(StoreError::Conflict(format!("service name '{name}' already exists")));
                }
            }
            let count = state.count_for(id);
            let svc = state.services.get_mut(&id).ok_or(StoreError::NotFound)?;
            if let Some(name) = patch.name {
                svc.name = name.trim().to_string();
            }
            if let Some(description) = patch.description {
                svc.description = description;
            }
            svc.updated_at = Utc::now().into();
            Ok(ServiceSummary::from_model(svc.clone(), count))
        }

        async fn delete(&self, id: i32) -> Result<(), StoreError> {
            self.injected()?;
            let mut state = self.state.lock().unwrap();
            if state.services.remove(&id).is_none() {
                return Err(StoreError::NotFound);
            }
            state.versions.retain(|_, v| v.service_id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl VersionRepository for InMemoryCatalog {
        async fn create(&self, service_id: i32, input: NewVersion) -> Result<Version, StoreError> {
            self.injected()?;
            version::validate_label(&input.version)?;
            let mut state = self.state.lock().unwrap();
            if !state.services.contains_key(&service_id) {
                return Err(StoreError::Invalid(format!("service {service_id} does not exist")));
            }
            state.next_version_id += 1;
            let now = Utc::now().into();
            let model = version::Model {
                id: state.next_version_id,
                service_id,
                version: input.version.trim().to_string(),
                description: input.description,
                is_active: input.is_active,
                created_at: now,
                updated_at: now,
            };
            state.versions.insert(model.id, model.clone());
            Ok(model)
        }

        async fn get(&self, id: i32, service_id: i32) -> Result<Version, StoreError> {
            self.injected()?;
            let state = self.state.lock().unwrap();
            state
                .versions
                .get(&id)
                .filter(|v| v.service_id == service_id)
                .cloned()
                .ok_or(StoreError::NotFound)
        }

        async fn update(&self, id: i32, service_id: i32, patch: VersionPatch) -> Result<Version, StoreError> {
            self.injected()?;
            if let Some(label) = &patch.version {
                version::validate_label(label)?;
            }
            let mut state = self.state.lock().unwrap();
            let v = state
                .versions
                .get_mut(&id)
                .filter(|v| v.service_id == service_id)
                .ok_or(StoreError::NotFound)?;
            if let Some(label) = patch.version {
                v.version = label.trim().to_string();
            }
            if let Some(description) = patch.description {
                v.description = description;
            }
            if let Some(active) = patch.is_active {
                v.is_active = active;
            }
            v.updated_at = Utc::now().into();
            Ok(v.clone())
        }

        async fn delete(&self, id: i32, service_id: i32) -> Result<(), StoreError> {
            self.injected()?;
            let mut state = self.state.lock().unwrap();
            match state.versions.get(&id) {
                Some(v) if v.service_id == service_id => {
                    state.versions.remove(&id);
                    Ok(())
                }
                _ => Err(StoreError::NotFound),
            }
        }
    }
}
