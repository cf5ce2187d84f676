//! # Reviews Storefront Shared
//!
//! This crate defines shared data structures for the reviews storefront storage
//! layer. It includes the entity document envelope handed to the write path, the
//! batch grouping consumed by the storage repository, the entry types returned
//! by reads, and the pagination request used by the read providers.

pub mod types;

pub use types::batch::{BatchOperationSet, StoreOperations};
pub use types::document::{DocumentId, EntityDocument, FieldValue, FilterTerms};
pub use types::entry::{Entry, EntryIterator};
pub use types::pagination::PaginationRequest;
