//! Core domain logic for bizstore.
//! A generic in-memory entity store and the business directory built on it.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{default_log_level, LoggingConfig, StoreConfig};
pub use logging::{init_logging, logging_status};
pub use model::business::{
    Address, Branch, Company, Country, Locality, ModelValidationError, Province, TimeOfDay,
};
pub use model::entity::{check_schema, Entity, EntityId, FieldValue, SchemaError};
pub use repo::entity_store::{
    EntityRepository, InMemoryEntityStore, StoreError, StoreResult, StoreView,
};
pub use service::directory_service::{BusinessDirectory, DirectoryError, DirectoryResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
