//! Eviction Policy Module
//!
//! Count-limit policy deciding how many least recently used entries must go.

use serde::Serialize;

use crate::error::CacheError;

// == Count Limit ==
/// Upper bound on the number of cached entries. Zero means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CountLimit(usize);

impl CountLimit {
    /// No limit at all.
    pub const UNBOUNDED: CountLimit = CountLimit(0);

    pub fn new(limit: usize) -> Self {
        Self(limit)
    }

    /// Raw limit, 0 when unbounded.
    pub fn get(self) -> usize {
        self.0
    }

    pub fn is_unbounded(self) -> bool {
        self.0 == 0
    }

    // == Overflow ==
    /// Number of entries that must be evicted to bring `count` within the
    /// limit.
    pub fn overflow(self, count: usize) -> usize {
        if self.is_unbounded() {
            0
        } else {
            count.saturating_sub(self.0)
        }
    }
}

impl TryFrom<i64> for CountLimit {
    type Error = CacheError;

    /// Accepts any non-negative limit.
    fn try_from(limit: i64) -> Result<Self, Self::Error> {
        usize::try_from(limit)
            .map(Self)
            .map_err(|_| CacheError::NegativeCountLimit(limit))
    }
}
