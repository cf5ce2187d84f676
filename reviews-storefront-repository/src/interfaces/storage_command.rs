//! Write command trait.

use async_trait::async_trait;

use reviews_storefront_shared::{DocumentId, EntityDocument};

use crate::errors::StorageError;

/// Bulk write access to a physical data source.
///
/// Writes address the physical current-version name, never an alias, so a
/// reindex in progress cannot siphon live writes into the wrong version.
/// Batches execute as one request; batch sizing is the caller's concern.
#[async_trait]
pub trait StorageCommand: Send + Sync {
    /// Insert documents in one bulk request, overwriting by id.
    ///
    /// Documents with a parent id are routed by it so parent and child land
    /// on the same shard.
    ///
    /// # Arguments
    ///
    /// * `data_source` - Physical data source name
    /// * `entity` - Entity type the documents belong to
    /// * `documents` - Documents to write
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every document was accepted
    /// * `Err(StorageError::Bulk)` - Transport failure, or one or more
    ///   documents rejected (sibling documents may still have been written)
    async fn bulk_insert(
        &self,
        data_source: &str,
        entity: &str,
        documents: &[EntityDocument],
    ) -> Result<(), StorageError>;

    /// Delete documents by id in one bulk request.
    ///
    /// Deleting absent documents succeeds; a data source dropped mid-flight
    /// is tolerated as a vacuous no-op.
    async fn bulk_delete(
        &self,
        data_source: &str,
        entity: &str,
        ids: &[DocumentId],
    ) -> Result<(), StorageError>;
}
