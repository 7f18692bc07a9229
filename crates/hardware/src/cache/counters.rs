//! Hierarchy-wide counters.
//!
//! Two pieces of state are shared across both levels:
//! 1. **Recency clock:** A monotonically increasing access counter. Every line touched by
//!    an access is stamped with the tick of that access, which gives a total order for LRU.
//! 2. **Write-back counter:** The number of dirty lines evicted from L2 (flushes to memory).
//!
//! Both are plain values owned by the hierarchy, so independent hierarchies never interfere.

use crate::common::constants::CLOCK_START;

/// Monotonic access counter used to order lines for LRU replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecencyClock {
    now: u64,
}

impl RecencyClock {
    /// Creates a clock that has not yet ticked.
    pub const fn new() -> Self {
        Self { now: CLOCK_START }
    }

    /// Advances the clock by one access and returns the new timestamp.
    ///
    /// The first tick returns `CLOCK_START + 1`, so every stamped line is strictly newer
    /// than a line that was never used.
    #[inline]
    pub const fn tick(&mut self) -> u64 {
        self.now += 1;
        self.now
    }

    /// Timestamp of the most recent access.
    #[inline]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Rewinds the clock to its initial value.
    pub const fn reset(&mut self) {
        self.now = CLOCK_START;
    }
}

impl Default for RecencyClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Count of dirty lines written back to memory on eviction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WritebackCounter {
    count: u64,
}

impl WritebackCounter {
    /// Creates a counter with nothing recorded.
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Records one dirty eviction.
    #[inline]
    pub const fn record(&mut self) {
        self.count += 1;
    }

    /// Number of write-backs recorded so far.
    #[inline]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Clears the counter.
    pub const fn reset(&mut self) {
        self.count = 0;
    }
}
