//! This module defines the core data structures shared between the storage layer
//! and its callers. It re-exports the most commonly used types.

pub mod batch;
pub mod document;
pub mod entry;
pub mod pagination;

pub use batch::{BatchOperationSet, StoreOperations};
pub use document::{DocumentId, EntityDocument, FieldValue, FilterTerms};
pub use entry::{Entry, EntryIterator};
pub use pagination::PaginationRequest;
