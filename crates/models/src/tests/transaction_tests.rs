use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait};

use super::{setup_test_db, unique};
use crate::{service, version};

/// Test basic transaction commit
#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let db = setup_test_db().await?;

    let txn = db.begin().await?;
    let svc = service::new_active_model(&unique("tx_commit"), "")?.insert(&txn).await?;
    version::new_active_model(svc.id, "1.0.0", "", true)?.insert(&txn).await?;
    txn.commit().await?;

    assert!(service::Entity::find_by_id(svc.id).one(&db).await?.is_some());
    let versions = version::Entity::find().filter(version::Column::ServiceId.eq(svc.id)).count(&db).await?;
    assert_eq!(versions, 1);
    Ok(())
}

/// Test transaction rollback
#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let db = setup_test_db().await?;

    let txn = db.begin().await?;
    let svc = service::new_active_model(&unique("tx_rollback"), "")?.insert(&txn).await?;
    txn.rollback().await?;

    assert!(service::Entity::find_by_id(svc.id).one(&db).await?.is_none());
    Ok(())
}

/// A transaction dropped without commit must not leave partial work behind
#[tokio::test]
async fn test_dropped_transaction_rolls_back() -> Result<()> {
    let db = setup_test_db().await?;

    let svc = service::new_active_model(&unique("tx_drop"), "")?.insert(&db).await?;
    version::new_active_model(svc.id, "1.0.0", "", true)?.insert(&db).await?;
    version::new_active_model(svc.id, "1.1.0", "", true)?.insert(&db).await?;

    {
        let txn = db.begin().await?;
        version::Entity::delete_many()
            .filter(version::Column::ServiceId.eq(svc.id))
            .exec(&txn)
            .await?;
        // dropped here, never committed
    }

    let remaining = version::Entity::find().filter(version::Column::ServiceId.eq(svc.id)).count(&db).await?;
    assert_eq!(remaining, 2);
    Ok(())
}

/// Test transaction with error handling
#[tokio::test]
async fn test_transaction_error_rolls_back_earlier_statements() -> Result<()> {
    let db = setup_test_db().await?;

    let name = unique("tx_error");
    let result = async {
        let txn = db.begin().await?;
        service::new_active_model(&name, "")?.insert(&txn).await?;
        // duplicate name fails inside the same transaction
        service::new_active_model(&name, "")?.insert(&txn).await?;
        txn.commit().await?;
        Ok::<(), anyhow::Error>(())
    }
    .await;
    assert!(result.is_err());

    let found = service::Entity::find().filter(service::Column::Name.eq(name)).one(&db).await?;
    assert!(found.is_none());
    Ok(())
}
