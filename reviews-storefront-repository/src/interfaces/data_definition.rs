//! Data definition trait.
//!
//! A minimal DDL façade over the engine: data source lifecycle, entity
//! mappings and alias management. This is deliberately not a general schema
//! migration tool.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::StorageError;

/// Schema and lifecycle operations on physical data sources.
///
/// Every method wraps exactly one engine call and translates engine failures
/// into the typed error named on the operation. Implementations are injected
/// into `StorageRepository` to enable testing with mock schemas.
#[async_trait]
pub trait DataDefinition: Send + Sync {
    /// Create a physical data source.
    ///
    /// Not idempotent: creating a name that already exists fails with a save
    /// error.
    ///
    /// # Arguments
    ///
    /// * `name` - Physical data source name
    /// * `metadata` - Engine-level settings for the new source; may be empty
    async fn create_data_source(&self, name: &str, metadata: Value) -> Result<(), StorageError>;

    /// Whether a data source or alias resolves.
    ///
    /// Never fails the caller's flow on absence; only transport errors
    /// propagate.
    async fn exists_data_source(&self, name: &str) -> Result<bool, StorageError>;

    /// Drop a physical data source.
    ///
    /// Deleting an absent source is an engine rejection; callers check
    /// existence first when absence is expected.
    async fn delete_data_source(&self, name: &str) -> Result<(), StorageError>;

    /// Force just-written documents to become visible to reads.
    ///
    /// Verification flows only; the regular write path never refreshes.
    async fn refresh_data_source(&self, name: &str) -> Result<(), StorageError>;

    /// Register the mapping for one entity type on a data source.
    ///
    /// Merges the entity's declarative mapping templates with the explicit
    /// `field_schema` definitions into one mapping update. Must run before
    /// the first write for the pair; later calls may add fields but never
    /// remove or retype them (the engine enforces this; violations surface
    /// as save errors naming the entity and the data source).
    async fn create_entity(
        &self,
        data_source: &str,
        entity: &str,
        field_schema: Map<String, Value>,
    ) -> Result<(), StorageError>;

    /// Bind an alias to a data source.
    async fn create_alias(&self, alias: &str, data_source: &str) -> Result<(), StorageError>;

    /// Repoint an alias from `old_data_source` to `new_data_source`.
    ///
    /// Both alias actions travel in one request, which the engine applies
    /// atomically: readers see the old source or the new one, never neither.
    /// On failure the alias is unchanged and a state error is returned.
    async fn switch_alias(
        &self,
        alias: &str,
        old_data_source: &str,
        new_data_source: &str,
    ) -> Result<(), StorageError>;
}
