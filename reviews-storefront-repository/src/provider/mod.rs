//! Read-side data providers.
//!
//! Thin wrappers over [`StorageQuery`](crate::interfaces::StorageQuery) that
//! resolve the right alias per entity type and apply the storefront paging
//! defaults.

mod rating_metadata;
mod review;

pub use rating_metadata::RatingMetadataProvider;
pub use review::ReviewDataProvider;
