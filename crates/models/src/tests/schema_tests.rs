use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, SqlErr};

use super::{setup_test_db, unique};
use crate::{service, version};

#[tokio::test]
async fn test_service_insert_assigns_id_and_timestamps() -> Result<()> {
    let db = setup_test_db().await?;

    let name = unique("billing");
    let created = service::new_active_model(&name, "Invoices and payments")?.insert(&db).await?;
    assert!(created.id > 0);
    assert_eq!(created.name, name);
    assert_eq!(created.created_at, created.updated_at);

    let found = service::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.map(|s| s.name), Some(name));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_service_name_is_unique_violation() -> Result<()> {
    let db = setup_test_db().await?;

    let name = unique("auth");
    service::new_active_model(&name, "first")?.insert(&db).await?;
    let err = service::new_active_model(&name, "second")?
        .insert(&db)
        .await
        .expect_err("duplicate name must be rejected by the store");
    assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))), "got {err:?}");

    let count = service::Entity::find().filter(service::Column::Name.eq(name)).count(&db).await?;
    assert_eq!(count, 1);
    Ok(())
}

#[tokio::test]
async fn test_version_requires_existing_service() -> Result<()> {
    let db = setup_test_db().await?;

    let err = version::new_active_model(987_654, "1.0.0", "orphan", true)?
        .insert(&db)
        .await
        .expect_err("dangling service_id must be rejected");
    assert!(matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn test_service_delete_restricted_while_versions_exist() -> Result<()> {
    let db = setup_test_db().await?;

    let svc = service::new_active_model(&unique("search"), "")?.insert(&db).await?;
    version::new_active_model(svc.id, "0.1.0", "", true)?.insert(&db).await?;

    let res = service::Entity::delete_by_id(svc.id).exec(&db).await;
    assert!(res.is_err(), "service with versions must not be deletable on its own");

    let versions = svc.find_related(version::Entity).all(&db).await?;
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].service_id, svc.id);
    assert!(versions[0].is_active);
    Ok(())
}

#[test]
fn test_blank_version_label_rejected_before_store() {
    assert!(version::new_active_model(1, "  ", "", true).is_err());
    assert!(service::new_active_model("", "desc").is_err());
}
