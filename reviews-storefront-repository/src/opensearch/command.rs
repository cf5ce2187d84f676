//! OpenSearch implementation of the write command contract.
//!
//! Writes go to physical data sources as single bulk requests. The engine
//! reports per-document outcomes even on HTTP 200, so every response body is
//! scanned for rejected documents.

use std::sync::Arc;

use async_trait::async_trait;
use opensearch::http::request::JsonBody;
use opensearch::params::Refresh;
use opensearch::BulkParts;
use serde_json::{json, Value};
use tracing::{debug, error};

use reviews_storefront_shared::{DocumentId, EntityDocument};

use crate::errors::{BulkAction, BulkError, DocumentError, StorageError};
use crate::interfaces::StorageCommand;
use crate::opensearch::connection::ConnectionPool;

/// Per-document error type tolerated inside bulk responses: the data source
/// vanished mid-flight, which makes the write a vacuous no-op.
const TOLERATED_ERROR_TYPE: &str = "index_not_found_exception";

/// Bulk write adapter.
pub struct OpenSearchCommand {
    pool: Arc<ConnectionPool>,
}

impl OpenSearchCommand {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Action/body line pairs for a bulk insert.
    fn insert_lines(documents: &[EntityDocument]) -> Vec<Value> {
        let mut lines = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            let mut action = json!({ "_id": document.id.to_json() });
            if let Some(parent) = &document.parent {
                action["routing"] = Value::from(parent.to_string());
            }
            lines.push(json!({ "index": action }));
            lines.push(document.to_json());
        }
        lines
    }

    /// Action lines for a bulk delete.
    fn delete_lines(ids: &[DocumentId]) -> Vec<Value> {
        ids.iter()
            .map(|id| json!({ "delete": { "_id": id.to_json() } }))
            .collect()
    }

    /// Collect non-tolerated per-document errors from a bulk response.
    fn scan_items(items: &[Value], action: BulkAction) -> Vec<DocumentError> {
        let mut errors = Vec::new();
        for item in items {
            let outcome = match item.get(action.as_str()) {
                Some(outcome) => outcome,
                None => continue,
            };
            let error = match outcome.get("error") {
                Some(error) => error,
                None => continue,
            };
            let error_type = error["type"].as_str().unwrap_or_default();
            if error_type == TOLERATED_ERROR_TYPE {
                continue;
            }
            errors.push(DocumentError {
                id: id_string(&outcome["_id"]),
                status: outcome["status"].as_u64().unwrap_or_default() as u16,
                error_type: error_type.to_string(),
                reason: error["reason"].as_str().unwrap_or_default().to_string(),
            });
        }
        errors
    }

    async fn execute(
        &self,
        data_source: &str,
        action: BulkAction,
        attempted_ids: Vec<DocumentId>,
        lines: Vec<Value>,
    ) -> Result<(), StorageError> {
        let client = self.pool.connection().await?;
        let body: Vec<JsonBody<Value>> = lines.into_iter().map(JsonBody::new).collect();

        let response = client
            .bulk(BulkParts::Index(data_source))
            .refresh(Refresh::False)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                BulkError::transport(action, data_source, attempted_ids.clone(), e.to_string())
            })?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(data_source = %data_source, status = %status, body = %error_body, "Bulk request failed");
            return Err(BulkError::transport(
                action,
                data_source,
                attempted_ids,
                format!("status {}: {}", status, error_body),
            )
            .into());
        }

        let response_body: Value = response.json().await.map_err(|e| {
            BulkError::transport(action, data_source, attempted_ids.clone(), e.to_string())
        })?;

        if response_body["errors"].as_bool().unwrap_or(false) {
            let items = response_body["items"].as_array().cloned().unwrap_or_default();
            let document_errors = Self::scan_items(&items, action);
            if !document_errors.is_empty() {
                error!(
                    data_source = %data_source,
                    rejected = document_errors.len(),
                    "Bulk request rejected documents"
                );
                return Err(
                    BulkError::documents(action, data_source, attempted_ids, document_errors)
                        .into(),
                );
            }
        }

        debug!(data_source = %data_source, action = %action, "Bulk request completed");
        Ok(())
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl StorageCommand for OpenSearchCommand {
    async fn bulk_insert(
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
            "Bulk insert"
        );
        let attempted_ids: Vec<DocumentId> =
            documents.iter().map(|document| document.id.clone()).collect();
        let lines = Self::insert_lines(documents);
        self.execute(data_source, BulkAction::Index, attempted_ids, lines)
            .await
    }

    async fn bulk_delete(
        &self,
        data_source: &str,
        entity: &str,
        ids: &[DocumentId],
    ) -> Result<(), StorageError> {
        if ids.is_empty() {
            return Ok(());
        }

        debug!(
            data_source = %data_source,
            entity = %entity,
            records = ids.len(),
            "Bulk delete"
        );
        self.execute(
            data_source,
            BulkAction::Delete,
            ids.to_vec(),
            Self::delete_lines(ids),
        )
        .await
    }
}
