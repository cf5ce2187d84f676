//! OpenSearch implementations of the storage contracts.
//!
//! This module provides the concrete implementations of `DataDefinition`,
//! `StorageCommand` and `StorageQuery` using the OpenSearch Rust crate, plus
//! the connection pool they share and the declarative entity mappings.

mod command;
mod connection;
mod ddl;
mod entity_config;
mod query;

pub use command::OpenSearchCommand;
pub use connection::{ConnectionPool, DEFAULT_POOL_KEY};
pub use ddl::OpenSearchDataDefinition;
pub use entity_config::{
    EntityConfig, EntityConfigRegistry, RatingMetadataConfig, ReviewConfig,
    RATING_METADATA_ENTITY, REVIEW_ENTITY,
};
pub use query::OpenSearchQuery;
