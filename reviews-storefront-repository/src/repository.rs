//! Storage repository implementation.
//!
//! This module provides the main entry point for persisting write batches.
//! Application code hands over a `BatchOperationSet` and the repository takes
//! care of name resolution, first-write provisioning and dispatch order.

use serde_json::{json, Map};
use tracing::{debug, trace};

use reviews_storefront_shared::{BatchOperationSet, DocumentId, EntityDocument};

use crate::errors::StorageError;
use crate::interfaces::{DataDefinition, StorageCommand};
use crate::state::State;

/// The main write-side API for the reviews storage layer.
///
/// Consumes heterogeneous batches grouped by entity type and store, resolves
/// each group to its physical data source and dispatches deletes before saves.
/// A group whose data source does not exist yet is provisioned on the fly
/// before its first insert; deletes against a missing source are skipped.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use reviews_storefront_repository::{
///     ConnectionPool, OpenSearchCommand, OpenSearchDataDefinition, State, StorageConfig,
///     StorageRepository,
/// };
/// use reviews_storefront_shared::{BatchOperationSet, EntityDocument};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(StorageConfig::from_env()?);
/// let pool = Arc::new(ConnectionPool::new(Arc::clone(&config)));
/// let repository = StorageRepository::new(
///     Box::new(OpenSearchCommand::new(Arc::clone(&pool))),
///     Box::new(OpenSearchDataDefinition::new(pool)),
///     State::new(config),
/// );
///
/// let mut batch = BatchOperationSet::new();
/// batch.save(
///     "review",
///     "",
///     EntityDocument::new(42u64).indexed_field("product_id", 7i64),
/// );
/// repository.save_to_storage(batch).await?;
/// # Ok(())
/// # }
/// ```
pub struct StorageRepository {
    command: Box<dyn StorageCommand>,
    schema: Box<dyn DataDefinition>,
    state: State,
}

impl StorageRepository {
    /// Create a new repository over injected command and schema backends.
    pub fn new(
        command: Box<dyn StorageCommand>,
        schema: Box<dyn DataDefinition>,
        state: State,
    ) -> Self {
        Self {
            command,
            schema,
            state,
        }
    }

    /// Persist one write batch.
    ///
    /// Groups are processed in deterministic (entity type, store) order, and
    /// inside each group deletes run before saves so a delete-then-recreate
    /// of the same id within one batch lands in the right final state.
    ///
    /// # Arguments
    ///
    /// * `batch` - Saves and deletes grouped by entity type and store code
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every group was dispatched successfully
    /// * `Err(StorageError)` - On the first group that fails; later groups
    ///   are not attempted
    pub async fn save_to_storage(&self, batch: BatchOperationSet) -> Result<(), StorageError> {
        for (entity_type, store_code, operations) in batch.into_groups() {
            let data_source = self
                .state
                .current_source_name(&[&store_code, &entity_type]);

            self.delete_entities(&data_source, &entity_type, &operations.delete)
                .await?;
            self.save_entities(&data_source, &entity_type, &operations.save)
                .await?;
        }
        Ok(())
    }

    /// Dispatch the delete subset of one group.
    ///
    /// A missing data source makes the deletes a vacuous no-op: there is
    /// nothing the documents could still exist in.
    async fn delete_entities(
        &self,
        data_source: &str,
        entity: &str,
        ids: &[DocumentId],
    ) -> Result<(), StorageError> {
        if ids.is_empty() {
            return Ok(());
        }

        if !self.schema.exists_data_source(data_source).await? {
            debug!(
                data_source = %data_source,
                entity = %entity,
                "Cannot delete entities: data source does not exist"
            );
            return Ok(());
        }

        debug!(data_source = %data_source, entity = %entity, records = ids.len(), "Deleting entities");
        trace!(data_source = %data_source, ids = ?ids, "Delete payload");

        self.command.bulk_delete(data_source, entity, ids).await
    }

    /// Dispatch the save subset of one group, provisioning the data source
    /// and entity mapping on the first write for the pair.
    async fn save_entities(
        &self,
        data_source: &str,
        entity: &str,
        documents: &[EntityDocument],
    ) -> Result<(), StorageError> {
        if documents.is_empty() {
            return Ok(());
        }

        debug!(
            data_source = %data_source,
            entity = %entity,
            records = documents.len(),
            "Saving entities"
        );
        trace!(data_source = %data_source, documents = ?documents, "Save payload");

        if !self.schema.exists_data_source(data_source).await? {
            self.schema.create_data_source(data_source, json!({})).await?;
            self.schema
                .create_entity(data_source, entity, Map::new())
                .await?;
        }

        self.command
            .bulk_insert(data_source, entity, documents)
            .await
    }
}
