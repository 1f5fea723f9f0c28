//! Services catalog: domain types, repository seams and the business service.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;

pub use errors::CatalogError;
pub use service::CatalogService;
