//! Take/skip pagination for list queries.

use serde::{Deserialize, Serialize};

/// Default number of records returned by a list query.
pub const DEFAULT_TAKE: u32 = 20;
/// Maximum number of records a single list query may return.
pub const MAX_TAKE: u32 = 1000;

/// Pagination window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Number of records to take (clamped to [`MAX_TAKE`]).
    pub take: u32,
    /// Number of records to skip.
    pub skip: u32,
}

impl Page {
    /// Build a page from optional request values, applying defaults and the clamp.
    pub fn new(take: Option<u32>, skip: Option<u32>) -> Self {
        Self {
            take: take.unwrap_or(DEFAULT_TAKE).min(MAX_TAKE),
            skip: skip.unwrap_or(0),
        }
    }

    /// SQL `OFFSET` value.
    pub fn offset(&self) -> i64 {
        i64::from(self.skip)
    }

    /// SQL `LIMIT` value.
    pub fn limit(&self) -> i64 {
        i64::from(self.take)
    }

    /// Apply the window to an already sorted in-memory result set.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skip as usize)
            .take(self.take as usize)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}
