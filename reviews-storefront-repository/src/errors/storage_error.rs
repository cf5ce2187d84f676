//! Storage error taxonomy.
//!
//! This module defines the unified error type for all storage operations. The
//! layer never retries on its own: every failure is logged with full context
//! and returned to the caller, which owns retry and backoff decisions.

use thiserror::Error;

use super::bulk_error::BulkError;

/// Unified errors from reviews storage operations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Fatal misconfiguration, detected at startup or on first connection use.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Read target missing, or id lookups rejected by the engine.
    #[error("Not found in data source '{data_source}': {details}")]
    NotFound { data_source: String, details: String },

    /// Data source or entity mapping creation failed.
    #[error("Could not save {target}: {cause}")]
    CouldNotSave { target: String, cause: String },

    /// Data source deletion failed.
    #[error("Could not delete {target}: {cause}")]
    CouldNotDelete { target: String, cause: String },

    /// Alias creation or switch failed. The multi-action request either fully
    /// applied or did not apply at all, so the alias is unchanged.
    #[error("State error: {0}")]
    State(String),

    /// A bulk write failed, wholesale or per document.
    #[error(transparent)]
    Bulk(#[from] BulkError),

    /// Network-level read failure, carrying the attempted query for diagnosis.
    #[error("Runtime error: {cause}; query: {query}")]
    Runtime { cause: String, query: String },
}

impl StorageError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a not-found error for a read target.
    pub fn not_found(data_source: impl Into<String>, details: impl Into<String>) -> Self {
        Self::NotFound {
            data_source: data_source.into(),
            details: details.into(),
        }
    }

    /// Create a save error.
    pub fn could_not_save(target: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::CouldNotSave {
            target: target.into(),
            cause: cause.into(),
        }
    }

    /// Create a delete error.
    pub fn could_not_delete(target: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::CouldNotDelete {
            target: target.into(),
            cause: cause.into(),
        }
    }

    /// Create an alias state-transition error.
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create a runtime error wrapping the attempted query.
    pub fn runtime(cause: impl Into<String>, query: impl Into<String>) -> Self {
        Self::Runtime {
            cause: cause.into(),
            query: query.into(),
        }
    }
}
