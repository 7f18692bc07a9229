//! Main memory latency model.
//!
//! This module provides the backing store behind L2:
//! 1. **MainMemory:** Trait reporting the latency of one block fetch.
//! 2. **FixedLatencyMemory:** Every access takes the same number of cycles.
//!
//! Memory is consulted only when L2 misses. Row-buffer or bank modelling is out of scope;
//! the trait is the seam where a richer model would plug in.

use crate::common::Address;

/// Backing store that reports access latency in cycles.
///
/// Implementors must be `Send` so a hierarchy can be moved behind a mutex.
pub trait MainMemory: Send {
    /// Returns the number of cycles needed to fetch the block at `address`.
    ///
    /// # Arguments
    ///
    /// * `address` - Block-aligned address being fetched.
    fn access_latency(&mut self, address: Address) -> u64;
}

/// Fixed-latency memory; every access takes the same number of cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedLatencyMemory {
    latency: u64,
}

impl FixedLatencyMemory {
    /// Creates a memory model with the given latency in cycles.
    pub const fn new(latency: u64) -> Self {
        Self { latency }
    }

    /// Configured latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }
}

impl MainMemory for FixedLatencyMemory {
    fn access_latency(&mut self, _address: Address) -> u64 {
        self.latency
    }
}
