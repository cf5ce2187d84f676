//! Integration tests for the read-side data providers.
//!
//! These tests use the real providers with a mock `StorageQuery` to verify
//! alias resolution, filter construction and paging defaults.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use reviews_storefront_repository::{
    RatingMetadataProvider, ReviewDataProvider, State, StorageConfig, StorageError, StorageQuery,
};
use reviews_storefront_shared::{
    DocumentId, Entry, EntryIterator, FieldValue, FilterTerms, PaginationRequest,
};

#[derive(Debug, Clone, PartialEq)]
enum QueryCall {
    GetEntries {
        data_source: String,
        entity: String,
        ids: Vec<DocumentId>,
        fields: Vec<String>,
    },
    Search {
        data_source: String,
        entity: String,
        terms: FilterTerms,
        size: Option<u32>,
        cursor: Option<u64>,
    },
    Count {
        data_source: String,
        entity: String,
        terms: FilterTerms,
    },
}

struct MockQuery {
    calls: Arc<Mutex<Vec<QueryCall>>>,
    entries: Vec<Entry>,
    count: u64,
}

#[async_trait]
impl StorageQuery for MockQuery {
    async fn get_entries(
        &self,
        data_source: &str,
        entity: &str,
        ids: &[DocumentId],
        fields: &[&str],
    ) -> Result<EntryIterator, StorageError> {
        self.calls.lock().unwrap().push(QueryCall::GetEntries {
            data_source: data_source.to_string(),
            entity: entity.to_string(),
            ids: ids.to_vec(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        });
        Ok(EntryIterator::from(self.entries.clone()))
    }

    async fn search_filtered_entries(
        &self,
        data_source: &str,
        entity: &str,
        terms: &FilterTerms,
        size: Option<u32>,
        cursor: Option<u64>,
    ) -> Result<EntryIterator, StorageError> {
        self.calls.lock().unwrap().push(QueryCall::Search {
            data_source: data_source.to_string(),
            entity: entity.to_string(),
            terms: terms.clone(),
            size,
            cursor,
        });
        Ok(EntryIterator::from(self.entries.clone()))
    }

    async fn get_entries_count(
        &self,
        data_source: &str,
        entity: &str,
        terms: &FilterTerms,
    ) -> Result<u64, StorageError> {
        self.calls.lock().unwrap().push(QueryCall::Count {
            data_source: data_source.to_string(),
            entity: entity.to_string(),
            terms: terms.clone(),
        });
        Ok(self.count)
    }
}

fn entry(id: &str) -> Entry {
    let mut fields = serde_json::Map::new();
    fields.insert("id".to_string(), json!(id));
    Entry::new(id, fields)
}

fn test_state() -> State {
    State::new(Arc::new(StorageConfig::default()))
}

fn review_provider(entries: Vec<Entry>) -> (ReviewDataProvider, Arc<Mutex<Vec<QueryCall>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let query = MockQuery {
        calls: Arc::clone(&calls),
        entries,
        count: 3,
    };
    (
        ReviewDataProvider::new(Box::new(query), test_state()),
        calls,
    )
}

fn review_terms(id_field: &str, id: i64, scope: &str) -> FilterTerms {
    let mut terms = FilterTerms::new();
    terms.insert(id_field.to_string(), FieldValue::from(id));
    terms.insert("visibility".to_string(), FieldValue::from(scope));
    terms
}

#[tokio::test]
async fn test_product_reviews_search_the_review_alias_with_defaults() {
    let (provider, calls) = review_provider(vec![entry("2"), entry("1")]);

    let reviews = provider
        .fetch_by_product_id(31, "default", None)
        .await
        .unwrap();

    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].id, "2");
    assert_eq!(
        *calls.lock().unwrap(),
        vec![QueryCall::Search {
            data_source: "reviews_storefront_review".to_string(),
            entity: "review".to_string(),
            terms: review_terms("product_id", 31, "default"),
            size: Some(12),
            cursor: Some(0),
        }]
    );
}

#[tokio::test]
async fn test_pagination_request_overrides_the_defaults() {
    let (provider, calls) = review_provider(vec![]);

    provider
        .fetch_by_product_id(31, "default", Some(PaginationRequest::new(5, 340)))
        .await
        .unwrap();

    match &calls.lock().unwrap()[0] {
        QueryCall::Search { size, cursor, .. } => {
            assert_eq!(*size, Some(5));
            assert_eq!(*cursor, Some(340));
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_customer_reviews_filter_by_customer_id() {
    let (provider, calls) = review_provider(vec![]);

    provider
        .fetch_by_customer_id(8, "default", None)
        .await
        .unwrap();

    match &calls.lock().unwrap()[0] {
        QueryCall::Search { terms, .. } => {
            assert_eq!(terms, &review_terms("customer_id", 8, "default"));
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_product_reviews_count_uses_the_same_filter() {
    let (provider, calls) = review_provider(vec![]);

    let count = provider.product_reviews_count(31, "default").await.unwrap();

    assert_eq!(count, 3);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![QueryCall::Count {
            data_source: "reviews_storefront_review".to_string(),
            entity: "review".to_string(),
            terms: review_terms("product_id", 31, "default"),
        }]
    );
}

#[tokio::test]
async fn test_custom_page_size_applies_without_pagination() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let query = MockQuery {
        calls: Arc::clone(&calls),
        entries: vec![],
        count: 0,
    };
    let provider = ReviewDataProvider::with_page_size(Box::new(query), test_state(), 24);

    provider.fetch_by_product_id(31, "default", None).await.unwrap();

    match &calls.lock().unwrap()[0] {
        QueryCall::Search { size, .. } => assert_eq!(*size, Some(24)),
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_rating_metadata_fetch_projects_the_fixed_fields() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let query = MockQuery {
        calls: Arc::clone(&calls),
        entries: vec![entry("1"), entry("5")],
        count: 0,
    };
    let provider = RatingMetadataProvider::new(Box::new(query), test_state());

    let ids = vec![DocumentId::from(1u64), DocumentId::from(5u64)];
    let metadata = provider.fetch(&ids, "default").await.unwrap();

    assert_eq!(metadata.len(), 2);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![QueryCall::GetEntries {
            data_source: "reviews_storefront_rating_metadata_default".to_string(),
            entity: "rating_metadata".to_string(),
            ids,
            fields: vec!["id".to_string(), "name".to_string(), "values".to_string()],
        }]
    );
}
