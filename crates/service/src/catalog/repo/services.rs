use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use models::{service, version};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Func, LikeExpr, Order, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::{bounded, DEFAULT_QUERY_TIMEOUT};
use crate::catalog::domain::{
    NewService, ServiceDetail, ServiceFilter, ServicePatch, ServiceSummary, SortColumn, SortOrder, Version,
};
use crate::catalog::repository::ServiceRepository;
use crate::errors::StoreError;

#[derive(Clone)]
pub struct SeaOrmServiceRepository {
    db: DatabaseConnection,
    query_timeout: Duration,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, query_timeout: DEFAULT_QUERY_TIMEOUT }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

#[derive(Debug, FromQueryResult)]
struct VersionCountRow {
    service_id: i32,
    count: i64,
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring match with the term's own wildcards escaped.
/// Postgres gets `ILIKE`; elsewhere `lower(col) LIKE`, which on SQLite only
/// folds ASCII letters.
fn contains_ci(backend: DbBackend, col: service::Column, term: &str) -> SimpleExpr {
    match backend {
        DbBackend::Postgres => {
            let pattern = format!("%{}%", escape_like(term));
            Expr::col(col).ilike(LikeExpr::new(pattern).escape('\\'))
        }
        _ => {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern).escape('\\'))
        }
    }
}

fn sort_column(col: SortColumn) -> service::Column {
    match col {
        SortColumn::Name => service::Column::Name,
        SortColumn::CreatedAt => service::Column::CreatedAt,
        SortColumn::UpdatedAt => service::Column::UpdatedAt,
    }
}

fn sort_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

/// Version counts for the given services in one grouped query.
async fn version_counts<C: ConnectionTrait>(conn: &C, ids: Vec<i32>) -> Result<HashMap<i32, u64>, StoreError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = version::Entity::find()
        .select_only()
        .column(version::Column::ServiceId)
        .column_as(Expr::col(version::Column::Id).count(), "count")
        .filter(version::Column::ServiceId.is_in(ids))
        .group_by(version::Column::ServiceId)
        .into_model::<VersionCountRow>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|r| (r.service_id, r.count.max(0) as u64)).collect())
}

/// Remove a service and all of its versions on `conn`. Callers supply the
/// transaction; nothing is committed here.
pub(crate) async fn delete_cascade<C: ConnectionTrait>(conn: &C, id: i32) -> Result<u64, StoreError> {
    if service::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Err(StoreError::NotFound);
    }
    let removed = version::Entity::delete_many()
        .filter(version::Column::ServiceId.eq(id))
        .exec(conn)
        .await?
        .rows_affected;
    let res = service::Entity::delete_by_id(id).exec(conn).await?;
    if res.rows_affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(removed)
}

#[async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn list(&self, filter: &ServiceFilter) -> Result<(Vec<ServiceSummary>, u64), StoreError> {
        bounded(self.query_timeout, "service.list", async {
            let backend = self.db.get_database_backend();
            let mut query = service::Entity::find();
            if let Some(term) = filter.name_term() {
                query = query.filter(contains_ci(backend, service::Column::Name, term));
            }
            if let Some(term) = filter.description_term() {
                query = query.filter(contains_ci(backend, service::Column::Description, term));
            }
            let query = query
                .order_by(sort_column(filter.sort), sort_order(filter.order))
                .order_by(service::Column::Id, Order::Asc);

            let total = query.clone().count(&self.db).await?;
            // offsets past the last row never reach the store
            let offset = filter.page.offset();
            let rows = if offset >= total {
                Vec::new()
            } else {
                query.offset(offset.min(i64::MAX as u64)).limit(filter.page.limit).all(&self.db).await?
            };

            let counts = version_counts(&self.db, rows.iter().map(|s| s.id).collect()).await?;
            let items: Vec<_> = rows
                .into_iter()
                .map(|s| {
                    let count = counts.get(&s.id).copied().unwrap_or(0);
                    ServiceSummary::from_model(s, count)
                })
                .collect();
            debug!(total, returned = items.len(), page = filter.page.page, "services listed");
            Ok((items, total))
        })
        .await
    }

    async fn get(&self, id: i32) -> Result<ServiceDetail, StoreError> {
        bounded(self.query_timeout, "service.get", async {
            let svc = service::Entity::find_by_id(id).one(&self.db).await?.ok_or(StoreError::NotFound)?;
            let versions = svc
                .find_related(version::Entity)
                .order_by_desc(version::Column::CreatedAt)
                .order_by_desc(version::Column::Id)
                .all(&self.db)
                .await?;
            Ok(ServiceDetail::from_model(svc, versions))
        })
        .await
    }

    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        bounded(self.query_timeout, "service.exists", async {
            let n = service::Entity::find_by_id(id).count(&self.db).await?;
            Ok(n > 0)
        })
        .await
    }

    async fn list_versions(&self, service_id: i32) -> Result<Vec<Version>, StoreError> {
        bounded(self.query_timeout, "service.list_versions", async {
            let versions = version::Entity::find()
                .filter(version::Column::ServiceId.eq(service_id))
                .order_by_desc(version::Column::CreatedAt)
                .order_by_desc(version::Column::Id)
                .all(&self.db)
                .await?;
            Ok(versions)
        })
        .await
    }

    async fn create(&self, input: NewService) -> Result<ServiceSummary, StoreError> {
        bounded(self.query_timeout, "service.create", async {
            let am = service::new_active_model(&input.name, &input.description)?;
            let created = am.insert(&self.db).await?;
            info!(service_id = created.id, name = %created.name, "service created");
            Ok(ServiceSummary::from_model(created, 0))
        })
        .await
    }

    async fn update(&self, id: i32, patch: ServicePatch) -> Result<ServiceSummary, StoreError> {
        bounded(self.query_timeout, "service.update", async {
            if let Some(name) = &patch.name {
                service::validate_name(name)?;
            }
            let txn = self.db.begin().await?;
            let existing = service::Entity::find_by_id(id).one(&txn).await?.ok_or(StoreError::NotFound)?;
            let mut am: service::ActiveModel = existing.into();
            if let Some(name) = patch.name {
                am.name = Set(name.trim().to_string());
            }
            if let Some(description) = patch.description {
                am.description = Set(description);
            }
            am.updated_at = Set(Utc::now().into());
            let updated = am.update(&txn).await?;
            let count = version::Entity::find()
                .filter(version::Column::ServiceId.eq(id))
                .count(&txn)
                .await?;
            txn.commit().await?;
            Ok(ServiceSummary::from_model(updated, count))
        })
        .await
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        bounded(self.query_timeout, "service.delete", async {
            let txn = self.db.begin().await?;
            let removed = delete_cascade(&txn, id).await?;
            txn.commit().await?;
            info!(service_id = id, versions_removed = removed, "service deleted");
            Ok(())
        })
        .await
    }
}
