//! Read query trait.

use async_trait::async_trait;

use reviews_storefront_shared::{DocumentId, EntryIterator, FilterTerms};

use crate::errors::StorageError;

/// Read access to storage.
///
/// Reads must address data sources through their alias so an in-flight
/// reader never observes a reindex cutover. Callers enumerate the fields
/// they need; whole-document fetches are not offered, which keeps response
/// sizes bounded by the caller.
#[async_trait]
pub trait StorageQuery: Send + Sync {
    /// Fetch documents by id, projecting exactly `fields`.
    ///
    /// Ids that resolve to nothing are logged at notice level and omitted
    /// from the result. Id-level errors from the engine (including a missing
    /// alias, which the engine reports per id) escalate the whole call to a
    /// not-found error listing every reason. Entries come back in the
    /// caller's id order regardless of engine response order.
    async fn get_entries(
        &self,
        data_source: &str,
        entity: &str,
        ids: &[DocumentId],
        fields: &[&str],
    ) -> Result<EntryIterator, StorageError>;

    /// Term-filtered search over one data source.
    ///
    /// Terms combine conjunctively on exact equality. With `size`, results
    /// are sorted by id descending and capped at `size`; a `cursor` greater
    /// than zero then continues strictly after that id. Without `size` the
    /// full match set comes back unsorted and the cursor is ignored, since
    /// cursor continuation is undefined without the sort.
    async fn search_filtered_entries(
        &self,
        data_source: &str,
        entity: &str,
        terms: &FilterTerms,
        size: Option<u32>,
        cursor: Option<u64>,
    ) -> Result<EntryIterator, StorageError>;

    /// Count documents matching the filter.
    ///
    /// A missing data source counts zero documents rather than failing.
    async fn get_entries_count(
        &self,
        data_source: &str,
        entity: &str,
        terms: &FilterTerms,
    ) -> Result<u64, StorageError>;
}
