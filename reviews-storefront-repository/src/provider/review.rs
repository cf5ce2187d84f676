//! Review storage reader.

use tracing::error;

use reviews_storefront_shared::{Entry, FieldValue, FilterTerms, PaginationRequest};

use crate::errors::StorageError;
use crate::interfaces::StorageQuery;
use crate::opensearch::REVIEW_ENTITY;
use crate::state::State;

/// Reviews returned per page when the caller sends no pagination.
const DEFAULT_PAGE_SIZE: u32 = 12;

/// Cursor value that starts at the newest review.
const FIRST_PAGE_CURSOR: u64 = 0;

/// Paged review reads for storefront listings.
///
/// Reviews live in one store-unqualified data source; the requested scope is
/// applied as a `visibility` term filter instead of a name qualifier. All
/// reads go through the review alias.
pub struct ReviewDataProvider {
    query: Box<dyn StorageQuery>,
    state: State,
    page_size: u32,
}

impl ReviewDataProvider {
    pub fn new(query: Box<dyn StorageQuery>, state: State) -> Self {
        Self::with_page_size(query, state, DEFAULT_PAGE_SIZE)
    }

    /// Create a provider with a custom default page size.
    pub fn with_page_size(query: Box<dyn StorageQuery>, state: State, page_size: u32) -> Self {
        Self {
            query,
            state,
            page_size,
        }
    }

    /// Fetch reviews of one product visible in the given scope.
    ///
    /// # Arguments
    ///
    /// * `product_id` - Upstream product id
    /// * `scope` - Scope code the reviews must be visible in
    /// * `pagination` - Page size and cursor; provider defaults when `None`
    pub async fn fetch_by_product_id(
        &self,
        product_id: i64,
        scope: &str,
        pagination: Option<PaginationRequest>,
    ) -> Result<Vec<Entry>, StorageError> {
        let mut terms = FilterTerms::new();
        terms.insert("product_id".to_string(), FieldValue::from(product_id));
        terms.insert("visibility".to_string(), FieldValue::from(scope));

        self.fetch_reviews(terms, pagination).await
    }

    /// Fetch reviews written by one customer, visible in the given scope.
    pub async fn fetch_by_customer_id(
        &self,
        customer_id: i64,
        scope: &str,
        pagination: Option<PaginationRequest>,
    ) -> Result<Vec<Entry>, StorageError> {
        let mut terms = FilterTerms::new();
        terms.insert("customer_id".to_string(), FieldValue::from(customer_id));
        terms.insert("visibility".to_string(), FieldValue::from(scope));

        self.fetch_reviews(terms, pagination).await
    }

    /// Count the reviews of one product visible in the given scope.
    pub async fn product_reviews_count(
        &self,
        product_id: i64,
        scope: &str,
    ) -> Result<u64, StorageError> {
        let mut terms = FilterTerms::new();
        terms.insert("product_id".to_string(), FieldValue::from(product_id));
        terms.insert("visibility".to_string(), FieldValue::from(scope));

        let alias = self.state.alias_name(&[REVIEW_ENTITY]);
        self.query
            .get_entries_count(&alias, REVIEW_ENTITY, &terms)
            .await
            .map_err(|e| {
                error!(alias = %alias, error = %e, "Failed to count reviews");
                e
            })
    }

    async fn fetch_reviews(
        &self,
        terms: FilterTerms,
        pagination: Option<PaginationRequest>,
    ) -> Result<Vec<Entry>, StorageError> {
        let alias = self.state.alias_name(&[REVIEW_ENTITY]);
        let size = pagination.map_or(self.page_size, |p| p.size());
        let cursor = pagination.map_or(FIRST_PAGE_CURSOR, |p| p.cursor());

        let entries = self
            .query
            .search_filtered_entries(&alias, REVIEW_ENTITY, &terms, Some(size), Some(cursor))
            .await
            .map_err(|e| {
                error!(alias = %alias, error = %e, "Failed to fetch reviews");
                e
            })?;

        Ok(entries.collect())
    }
}
