//! Migrator for the catalog schema. Tables are created parent-first;
//! secondary indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250501_000001_create_service;
mod m20250501_000002_create_version;
mod m20250501_000003_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250501_000001_create_service::Migration),
            Box::new(m20250501_000002_create_version::Migration),
            // Indexes should always be applied last
            Box::new(m20250501_000003_add_indexes::Migration),
        ]
    }
}
