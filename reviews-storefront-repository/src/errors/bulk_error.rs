//! Structured bulk write failures.
//!
//! A bulk request can fail wholesale (transport) or per document (the engine
//! answered but rejected individual actions). Callers need the two cases told
//! apart programmatically: the first is safe to resubmit, the second is not.

use std::fmt;

use reviews_storefront_shared::DocumentId;
use thiserror::Error;

/// Kind of bulk operation, as written into action headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Index,
    Delete,
}

impl BulkAction {
    /// Action key used in bulk request headers and response items.
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Index => "index",
            BulkAction::Delete => "delete",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejected document inside a bulk response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentError {
    pub id: String,
    pub status: u16,
    pub error_type: String,
    pub reason: String,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id: {}, status: {}, error: {}: {}",
            self.id, self.status, self.error_type, self.reason
        )
    }
}

/// What went wrong with a bulk request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkFailure {
    /// The request itself failed; no per-document outcome exists.
    Transport(String),
    /// The request went through but these documents were rejected.
    Documents(Vec<DocumentError>),
}

impl fmt::Display for BulkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkFailure::Transport(cause) => write!(f, "transport failure: {}", cause),
            BulkFailure::Documents(errors) => {
                let details: Vec<String> = errors.iter().map(DocumentError::to_string).collect();
                write!(f, "list of errors: {}", details.join("; "))
            }
        }
    }
}

/// A failed bulk write, carrying everything needed to decide on resubmission:
/// the operation, the target data source, every attempted id and the failure
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Bulk {action} to '{data_source}' failed for entity ids [{}]: {failure}", join_ids(.attempted_ids))]
pub struct BulkError {
    pub action: BulkAction,
    pub data_source: String,
    pub attempted_ids: Vec<DocumentId>,
    pub failure: BulkFailure,
}

impl BulkError {
    /// Whole-request failure before any per-document outcome.
    pub fn transport(
        action: BulkAction,
        data_source: impl Into<String>,
        attempted_ids: Vec<DocumentId>,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            action,
            data_source: data_source.into(),
            attempted_ids,
            failure: BulkFailure::Transport(cause.into()),
        }
    }

    /// Per-document rejections from an `errors: true` response.
    pub fn documents(
        action: BulkAction,
        data_source: impl Into<String>,
        attempted_ids: Vec<DocumentId>,
        errors: Vec<DocumentError>,
    ) -> Self {
        Self {
            action,
            data_source: data_source.into(),
            attempted_ids,
            failure: BulkFailure::Documents(errors),
        }
    }

    /// True when resubmitting the identical batch may succeed.
    ///
    /// Transport failures qualify: inserts overwrite by id and deletes of
    /// absent documents succeed, so replaying the whole batch is harmless.
    /// Per-document rejections are permanent for the same payload.
    pub fn is_retryable(&self) -> bool {
        matches!(self.failure, BulkFailure::Transport(_))
    }
}

fn join_ids(ids: &[DocumentId]) -> String {
    ids.iter()
        .map(DocumentId::to_string)
        .collect::<Vec<String>>()
        .join(", ")
}
