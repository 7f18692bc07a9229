//! Two-level cache hierarchy.
//!
//! `Hierarchy` owns L1, L2 (and through it main memory) together with the recency clock.
//! It is the only entry point a driver needs: [`Hierarchy::access`] runs one access to
//! completion, including any cascading miss, eviction and inclusion invalidation, and
//! returns its latency.
//!
//! The L1→L2 forwarding link and the L2→L1 invalidation link are borrows handed down for
//! the duration of each access, so neither level owns or outlives the other.

use tracing::{debug, trace};

use crate::cache::{AccessOutcome, CacheLevel, L1Cache, L2Cache, RecencyClock};
use crate::common::{Address, ConfigError};
use crate::config::HierarchyConfig;
use crate::memory::{FixedLatencyMemory, MainMemory};

/// L1 + L2 + memory, driven one access at a time.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::HierarchyConfig;
/// use cachesim_core::Hierarchy;
///
/// let mut hierarchy = Hierarchy::new(&HierarchyConfig::default()).unwrap();
///
/// // Cold write: L1 miss, L2 miss, memory fetch.
/// let first = hierarchy.access(0x00, true);
/// assert_eq!(first.cycles, 1 + 10 + 100);
/// assert!(!first.hit);
///
/// // Same block again: L1 hit.
/// let second = hierarchy.access(0x04, false);
/// assert_eq!(second.cycles, 1);
/// assert!(second.hit);
/// ```
#[derive(Debug)]
pub struct Hierarchy {
    l1: L1Cache,
    l2: L2Cache,
    clock: RecencyClock,
}

impl Hierarchy {
    /// Builds a hierarchy backed by fixed-latency memory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either level's geometry is invalid or L1 blocks are
    /// larger than L2 blocks.
    pub fn new(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        let memory = FixedLatencyMemory::new(config.memory.latency);
        Self::with_memory(config, Box::new(memory))
    }

    /// Builds a hierarchy backed by a caller-supplied memory model.
    ///
    /// `config.memory` is ignored; `memory` alone decides miss latency below L2.
    ///
    /// # Errors
    ///
    /// Same as [`Hierarchy::new`].
    pub fn with_memory(
        config: &HierarchyConfig,
        memory: Box<dyn MainMemory>,
    ) -> Result<Self, ConfigError> {
        let l1 = L1Cache::new(&config.l1)?;
        let l2 = L2Cache::new(&config.l2, memory)?;

        let l1_block = l1.geometry().block_bytes();
        let l2_block = l2.geometry().block_bytes();
        if l1_block > l2_block {
            return Err(ConfigError::BlockSizeMismatch { l1_block, l2_block });
        }

        debug!(
            l1_sets = l1.geometry().num_sets(),
            l1_ways = l1.geometry().associativity(),
            l2_sets = l2.geometry().num_sets(),
            l2_ways = l2.geometry().associativity(),
            write_policy = ?l1.write_policy(),
            "hierarchy built"
        );

        Ok(Self {
            l1,
            l2,
            clock: RecencyClock::new(),
        })
    }

    /// Performs one access.
    ///
    /// The recency clock advances exactly once per call, whether the access hits or misses,
    /// and every line touched during the access is stamped with that tick.
    ///
    /// # Arguments
    ///
    /// * `address` - 32-bit byte address.
    /// * `is_write` - Access is a store.
    ///
    /// # Returns
    ///
    /// Total latency and the L1 (and, on an L1 miss, L2) hit flags.
    pub fn access(&mut self, address: u32, is_write: bool) -> AccessOutcome {
        self.access_at(Address::new(address), is_write)
    }

    /// Same as [`access`](Self::access) for an already-typed address.
    pub fn access_at(&mut self, address: Address, is_write: bool) -> AccessOutcome {
        let now = self.clock.tick();
        let outcome = self.l1.lookup(address, is_write, now, &mut self.l2);
        trace!(
            %address,
            is_write,
            cycles = outcome.cycles,
            hit = outcome.hit,
            l2_hit = ?outcome.l2_hit,
            "access"
        );
        outcome
    }

    /// Number of dirty lines evicted from L2 so far.
    pub const fn writebacks(&self) -> u64 {
        self.l2.writebacks()
    }

    /// The top-level cache.
    pub const fn l1(&self) -> &L1Cache {
        &self.l1
    }

    /// The second-level cache.
    pub const fn l2(&self) -> &L2Cache {
        &self.l2
    }

    /// Returns every line to invalid and zeroes the clock and write-back counter.
    pub fn reset(&mut self) {
        self.l1.reset();
        self.l2.reset();
        self.clock.reset();
    }
}
