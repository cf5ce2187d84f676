//! # Reviews Storefront Repository
//!
//! This crate provides the index storage abstraction layer for the reviews
//! storefront. It includes definitions for errors, configuration, the storage
//! contracts (schema management, bulk writes, alias-addressed reads) and their
//! concrete OpenSearch implementations, plus the storage repository driven by
//! the import pipeline and the read-side data providers.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod provider;
pub mod repository;
pub mod state;

pub use config::{ConnectionSettings, StorageConfig};
pub use errors::{BulkAction, BulkError, BulkFailure, DocumentError, StorageError};
pub use interfaces::{DataDefinition, StorageCommand, StorageQuery};
pub use opensearch::{
    ConnectionPool, EntityConfig, EntityConfigRegistry, OpenSearchCommand,
    OpenSearchDataDefinition, OpenSearchQuery, RatingMetadataConfig, ReviewConfig,
    DEFAULT_POOL_KEY, RATING_METADATA_ENTITY, REVIEW_ENTITY,
};
pub use provider::{RatingMetadataProvider, ReviewDataProvider};
pub use repository::StorageRepository;
pub use state::State;
