//! Rating metadata storage reader.

use tracing::error;

use reviews_storefront_shared::{DocumentId, Entry};

use crate::errors::StorageError;
use crate::interfaces::StorageQuery;
use crate::opensearch::RATING_METADATA_ENTITY;
use crate::state::State;

/// Fields projected for rating metadata reads.
const RATING_METADATA_FIELDS: [&str; 3] = ["id", "name", "values"];

/// Id-based rating metadata reads.
///
/// Rating metadata is store-qualified, so the alias carries the store code.
pub struct RatingMetadataProvider {
    query: Box<dyn StorageQuery>,
    state: State,
}

impl RatingMetadataProvider {
    pub fn new(query: Box<dyn StorageQuery>, state: State) -> Self {
        Self { query, state }
    }

    /// Fetch rating metadata documents by id for one store.
    ///
    /// Ids that do not resolve are omitted from the result; the relative
    /// order of the ones that do follows `rating_ids`.
    pub async fn fetch(
        &self,
        rating_ids: &[DocumentId],
        store_code: &str,
    ) -> Result<Vec<Entry>, StorageError> {
        let alias = self
            .state
            .alias_name(&[store_code, RATING_METADATA_ENTITY]);

        let entries = self
            .query
            .get_entries(
                &alias,
                RATING_METADATA_ENTITY,
                rating_ids,
                &RATING_METADATA_FIELDS,
            )
            .await
            .map_err(|e| {
                error!(alias = %alias, error = %e, "Failed to fetch rating metadata");
                e
            })?;

        Ok(entries.collect())
    }
}
