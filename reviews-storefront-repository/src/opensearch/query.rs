//! OpenSearch implementation of the read query contract.
//!
//! All reads address the alias, never a physical data source, so queries keep
//! working across a reindex cutover. Request bodies are built as plain JSON
//! and handed to the engine untouched.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use opensearch::{MgetParts, SearchParts};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use reviews_storefront_shared::{DocumentId, Entry, EntryIterator, FilterTerms};

use crate::errors::StorageError;
use crate::interfaces::StorageQuery;
use crate::opensearch::connection::ConnectionPool;

/// Read query adapter.
pub struct OpenSearchQuery {
    pool: Arc<ConnectionPool>,
}

impl OpenSearchQuery {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// One exact-match clause per filter term.
    fn term_filters(terms: &FilterTerms) -> Vec<Value> {
        terms
            .iter()
            .map(|(field, value)| {
                let mut term = Map::new();
                term.insert(field.clone(), value.to_json());
                json!({ "term": term })
            })
            .collect()
    }

    /// Search request body.
    ///
    /// Without terms the `query` key is omitted and the engine matches
    /// everything. The cursor only applies together with `size`, because
    /// continuation is undefined without the id sort that `size` brings in.
    fn search_body(terms: &FilterTerms, size: Option<u32>, cursor: Option<u64>) -> Value {
        let mut body = Map::new();
        if !terms.is_empty() {
            body.insert(
                "query".to_string(),
                json!({ "bool": { "filter": Self::term_filters(terms) } }),
            );
        }
        if let Some(size) = size {
            body.insert("size".to_string(), json!(size));
            body.insert("sort".to_string(), json!([{ "_id": "desc" }]));
            if let Some(cursor) = cursor {
                if cursor > 0 {
                    body.insert("search_after".to_string(), json!([cursor]));
                }
            }
        }
        Value::Object(body)
    }

    /// Count request body: no hits, one filtered aggregation.
    fn count_body(terms: &FilterTerms) -> Value {
        let mut bool_query = Map::new();
        if !terms.is_empty() {
            bool_query.insert("filter".to_string(), json!(Self::term_filters(terms)));
        }
        json!({
            "size": 0,
            "aggs": { "entries_count": { "filter": { "bool": bool_query } } }
        })
    }

    fn count_from_response(response_body: &Value) -> u64 {
        response_body["aggregations"]["entries_count"]["doc_count"]
            .as_u64()
            .unwrap_or(0)
    }

    /// Turn an mget response into entries, in the caller's id order.
    ///
    /// Ids the engine could not find are logged and dropped. Id-level errors
    /// (a missing alias shows up here, reported per id) fail the whole call.
    fn collect_entries(
        data_source: &str,
        ids: &[DocumentId],
        docs: &[Value],
    ) -> Result<Vec<Entry>, StorageError> {
        let mut found: HashMap<String, Entry> = HashMap::new();
        let mut missing: Vec<String> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        for doc in docs {
            let id = id_string(&doc["_id"]);
            if let Some(error) = doc.get("error") {
                let reason = error["reason"].as_str().unwrap_or_default();
                errors.push(format!("Entity id: {} Reason: {}", id, reason));
                continue;
            }
            if !doc["found"].as_bool().unwrap_or(false) {
                missing.push(id);
                continue;
            }
            let fields = doc["_source"].as_object().cloned().unwrap_or_default();
            found.insert(id.clone(), Entry::new(id, fields));
        }

        if !errors.is_empty() {
            let details = errors.join("; ");
            error!(data_source = %data_source, details = %details, "Get entries returned errors");
            return Err(StorageError::not_found(data_source, details));
        }
        if !missing.is_empty() {
            info!(data_source = %data_source, ids = ?missing, "Items not found in data source");
        }

        Ok(ids
            .iter()
            .filter_map(|id| found.remove(&id.to_string()))
            .collect())
    }

    /// Send a search body and return the parsed response.
    ///
    /// A 404 means the data source behind the alias does not exist yet;
    /// callers decide whether that is an error or an empty result.
    async fn search_request(
        &self,
        data_source: &str,
        entity: &str,
        body: Value,
    ) -> Result<Value, StorageError> {
        let client = self.pool.connection().await?;
        let query = body.to_string();

        let response = client
            .search(SearchParts::Index(&[data_source]))
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::runtime(e.to_string(), query.clone()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Err(StorageError::not_found(
                data_source,
                "data source does not exist",
            ));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                data_source = %data_source,
                entity = %entity,
                status = %status,
                body = %error_body,
                "Search request failed"
            );
            return Err(StorageError::runtime(
                format!("status {}: {}", status, error_body),
                query,
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StorageError::runtime(e.to_string(), query))
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl StorageQuery for OpenSearchQuery {
    async fn get_entries(
        &self,
        data_source: &str,
        entity: &str,
        ids: &[DocumentId],
        fields: &[&str],
    ) -> Result<EntryIterator, StorageError> {
        if ids.is_empty() {
            return Ok(EntryIterator::from(Vec::new()));
        }

        debug!(
            data_source = %data_source,
            entity = %entity,
            records = ids.len(),
            fields = ?fields,
            "Get entries"
        );

        let client = self.pool.connection().await?;
        let id_values: Vec<Value> = ids.iter().map(DocumentId::to_json).collect();
        let body = json!({ "ids": id_values });
        let query = body.to_string();

        let response = client
            .mget(MgetParts::Index(data_source))
            ._source(fields)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::runtime(e.to_string(), query.clone()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                data_source = %data_source,
                entity = %entity,
                status = %status,
                body = %error_body,
                "Get entries request failed"
            );
            return Err(StorageError::runtime(
                format!("status {}: {}", status, error_body),
                query,
            ));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| StorageError::runtime(e.to_string(), query))?;
        let docs = response_body["docs"].as_array().cloned().unwrap_or_default();
        let entries = Self::collect_entries(data_source, ids, &docs)?;

        Ok(EntryIterator::from(entries))
    }

    async fn search_filtered_entries(
        &self,
        data_source: &str,
        entity: &str,
        terms: &FilterTerms,
        size: Option<u32>,
        cursor: Option<u64>,
    ) -> Result<EntryIterator, StorageError> {
        debug!(
            data_source = %data_source,
            entity = %entity,
            terms = ?terms,
            size = ?size,
            cursor = ?cursor,
            "Search entries"
        );

        let body = Self::search_body(terms, size, cursor);
        let response_body = self.search_request(data_source, entity, body).await?;

        let hits = response_body["hits"]["hits"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        let entries: Vec<Entry> = hits
            .iter()
            .map(|hit| {
                let fields = hit["_source"].as_object().cloned().unwrap_or_default();
                Entry::new(id_string(&hit["_id"]), fields)
            })
            .collect();

        Ok(EntryIterator::from(entries))
    }

    async fn get_entries_count(
        &self,
        data_source: &str,
        entity: &str,
        terms: &FilterTerms,
    ) -> Result<u64, StorageError> {
        debug!(data_source = %data_source, entity = %entity, terms = ?terms, "Count entries");

        let body = Self::count_body(terms);
        match self.search_request(data_source, entity, body).await {
            Ok(response_body) => Ok(Self::count_from_response(&response_body)),
            Err(StorageError::NotFound { .. }) => Ok(0),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use reviews_storefront_shared::{EntityDocument, FieldValue};

    fn review_terms() -> FilterTerms {
        let mut terms = FilterTerms::new();
        terms.insert("product_id".to_string(), FieldValue::from(31i64));
        terms.insert("visibility".to_string(), FieldValue::from("4"));
        terms
    }

    #[test]
    fn test_search_body_with_terms_size_and_sort() {
        let body = OpenSearchQuery::search_body(&review_terms(), Some(12), Some(0));

        assert_eq!(
            body,
            json!({
                "query": { "bool": { "filter": [
                    { "term": { "product_id": 31 } },
                    { "term": { "visibility": "4" } }
                ] } },
                "size": 12,
                "sort": [{ "_id": "desc" }]
            })
        );
    }

    #[test]
    fn test_search_body_without_terms_matches_everything() {
        let body = OpenSearchQuery::search_body(&FilterTerms::new(), Some(5), None);

        assert!(body.get("query").is_none());
        assert_eq!(body["size"], json!(5));
    }

    #[test]
    fn test_search_body_cursor_continues_after_id() {
        let body = OpenSearchQuery::search_body(&review_terms(), Some(12), Some(340));

        assert_eq!(body["search_after"], json!([340]));
        assert_eq!(body["sort"], json!([{ "_id": "desc" }]));
    }

    #[test]
    fn test_search_body_ignores_cursor_without_size() {
        let body = OpenSearchQuery::search_body(&review_terms(), None, Some(340));

        assert!(body.get("size").is_none());
        assert!(body.get("sort").is_none());
        assert!(body.get("search_after").is_none());
    }

    #[test]
    fn test_count_body_wraps_terms_in_filter_aggregation() {
        let body = OpenSearchQuery::count_body(&review_terms());

        assert_eq!(
            body,
            json!({
                "size": 0,
                "aggs": { "entries_count": { "filter": { "bool": { "filter": [
                    { "term": { "product_id": 31 } },
                    { "term": { "visibility": "4" } }
                ] } } } }
            })
        );
    }

    #[test]
    fn test_count_body_without_terms_counts_everything() {
        let body = OpenSearchQuery::count_body(&FilterTerms::new());

        assert_eq!(
            body,
            json!({
                "size": 0,
                "aggs": { "entries_count": { "filter": { "bool": {} } } }
            })
        );
    }

    #[test]
    fn test_count_from_response_reads_aggregation() {
        let response = json!({
            "aggregations": { "entries_count": { "doc_count": 17 } }
        });

        assert_eq!(OpenSearchQuery::count_from_response(&response), 17);
    }

    #[test]
    fn test_count_from_response_defaults_to_zero() {
        assert_eq!(OpenSearchQuery::count_from_response(&json!({})), 0);
    }

    #[test]
    fn test_collect_entries_preserves_caller_order() {
        let ids = vec![DocumentId::from(2u64), DocumentId::from(1u64)];
        let docs = vec![
            json!({ "_id": "1", "found": true, "_source": { "id": 1 } }),
            json!({ "_id": "2", "found": true, "_source": { "id": 2 } }),
        ];

        let entries = OpenSearchQuery::collect_entries("reviews", &ids, &docs)
            .expect("entries should collect");

        let order: Vec<String> = entries.into_iter().map(|e| e.id).collect();
        assert_eq!(order, vec!["2", "1"]);
    }

    #[test]
    fn test_collect_entries_omits_missing_ids() {
        let ids = vec![DocumentId::from(1u64), DocumentId::from(9u64)];
        let docs = vec![
            json!({ "_id": "1", "found": true, "_source": { "id": 1 } }),
            json!({ "_id": "9", "found": false }),
        ];

        let entries = OpenSearchQuery::collect_entries("reviews", &ids, &docs)
            .expect("entries should collect");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "1");
    }

    #[test]
    fn test_collect_entries_escalates_engine_errors() {
        let ids = vec![DocumentId::from(3u64)];
        let docs = vec![json!({ "_id": "3", "error": {
            "type": "index_not_found_exception",
            "reason": "no such index [reviews]"
        } })];

        let error = OpenSearchQuery::collect_entries("reviews", &ids, &docs)
            .expect_err("engine errors should escalate");

        match error {
            StorageError::NotFound {
                data_source,
                details,
            } => {
                assert_eq!(data_source, "reviews");
                assert_eq!(details, "Entity id: 3 Reason: no such index [reviews]");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_collect_entries_round_trips_document_fields() {
        let document = EntityDocument::new(11u64)
            .indexed_field("product_id", 31i64)
            .stored_field("title", json!("Solid"));
        let ids = vec![DocumentId::from(11u64)];
        let docs = vec![json!({ "_id": "11", "found": true, "_source": document.to_json() })];

        let entries = OpenSearchQuery::collect_entries("reviews", &ids, &docs)
            .expect("entries should collect");

        assert_eq!(entries[0].field("product_id"), Some(&json!(31)));
        assert_eq!(entries[0].field("title"), Some(&json!("Solid")));
        assert_eq!(entries[0].field("id"), Some(&json!(11)));
    }
}
