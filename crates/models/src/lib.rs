//! Entity store for the services catalog: SeaORM entities, schema-level
//! validation and the connection-pool lifecycle.
pub mod errors;
pub mod db;
pub mod service;
pub mod version;

#[cfg(test)]
mod tests;
