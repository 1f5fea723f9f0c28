//! Service layer for the services catalog.
//! - Repositories translate catalog queries into SeaORM statements.
//! - `CatalogService` owns parent checks and error translation.
//! - Entity definitions and validation live in the `models` crate.

pub mod errors;
pub mod pagination;
pub mod catalog;
#[cfg(test)]
pub mod test_support;
