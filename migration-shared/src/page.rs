//! Page window used for cursor-based pagination.

use serde::{Deserialize, Serialize};

/// One bounded window of results.
///
/// `offset` is 1-based. The window advances by the number of records a source
/// actually returned, which may be fewer than `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based index of the first record in the window.
    pub offset: u64,
    /// Maximum number of records to return.
    pub size: u64,
}

impl Page {
    /// Create a page window, rejecting a zero offset or a zero size.
    pub fn new(offset: u64, size: u64) -> Option<Self> {
        if offset == 0 || size == 0 {
            return None;
        }
        Some(Self { offset, size })
    }

    /// The first window of a result set.
    pub fn first(size: u64) -> Option<Self> {
        Self::new(1, size)
    }

    /// The window following this one once `returned` records were received.
    pub fn advance(self, returned: u64) -> Self {
        Self {
            offset: self.offset + returned,
            size: self.size,
        }
    }

    /// Zero-based offset, as expected by SQL `OFFSET`.
    pub fn zero_based_offset(&self) -> u64 {
        self.offset - 1
    }
}
