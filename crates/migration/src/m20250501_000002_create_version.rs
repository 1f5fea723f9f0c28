//! Create `version` table with FK to `service`.
//!
//! The FK restricts deletes: a service row can only go once its versions are gone,
//! so the application-level cascade cannot leave orphans behind.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Version::Table)
                    .if_not_exists()
                    .col(pk_auto(Version::Id))
                    .col(integer(Version::ServiceId).not_null())
                    .col(string_len(Version::Version, 128).not_null())
                    .col(text(Version::Description).not_null().default(""))
                    .col(boolean(Version::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Version::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Version::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_version_service")
                            .from(Version::Table, Version::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Version::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Version { Table, Id, ServiceId, Version, Description, IsActive, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Service { Table, Id }
