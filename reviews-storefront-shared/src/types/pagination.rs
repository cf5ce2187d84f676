//! Pagination request passed by read callers.

use serde::{Deserialize, Serialize};

/// Page size and continuation cursor for filtered reads.
///
/// The cursor is the id of the last document of the previous page in the
/// descending-id sort; zero requests the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRequest {
    size: u32,
    cursor: u64,
}

impl PaginationRequest {
    pub fn new(size: u32, cursor: u64) -> Self {
        Self { size, cursor }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }
}
