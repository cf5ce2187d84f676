//! Error types for the reviews storage layer.
//!
//! This module provides the unified error type for all storage operations and
//! the structured bulk failure it carries for write batches.

mod bulk_error;
mod storage_error;

pub use bulk_error::{BulkAction, BulkError, BulkFailure, DocumentError};
pub use storage_error::StorageError;
