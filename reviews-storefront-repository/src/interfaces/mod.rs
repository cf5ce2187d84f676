//! Interface definitions for the storage layer.
//!
//! These traits split storage access by concern (schema DDL, writes, reads)
//! and allow dependency injection and swappable engine implementations.

mod data_definition;
mod storage_command;
mod storage_query;

pub use data_definition::DataDefinition;
pub use storage_command::StorageCommand;
pub use storage_query::StorageQuery;
