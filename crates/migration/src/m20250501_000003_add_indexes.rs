use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: lookup and sort by name
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_service_name")
                    .table(Service::Table)
                    .col(Service::Name)
                    .to_owned(),
            )
            .await?;

        // Version: scoped lookups and per-service counts
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_version_service")
                    .table(Version::Table)
                    .col(Version::ServiceId)
                    .to_owned(),
            )
            .await?;

        // Version: newest-first listing per service
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_version_service_created")
                    .table(Version::Table)
                    .col(Version::ServiceId)
                    .col(Version::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_name").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_version_service").table(Version::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_version_service_created").table(Version::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service { Table, Name }

#[derive(DeriveIden)]
enum Version { Table, ServiceId, CreatedAt }
