//! L1 Cache.
//!
//! The top level of the hierarchy. Hits are served at L1 latency; misses are forwarded to
//! L2 and the fill is installed on the way back, unless the access is a write and L1 is
//! configured write-no-allocate. L1 is write-back: a write hit only marks the line dirty,
//! and the dirty block reaches L2 when it is evicted.

use tracing::{trace, warn};

use super::{AccessOutcome, CacheArray, CacheLevel, L2Cache, UpperLevel};
use crate::common::{Address, ConfigError};
use crate::config::L1Config;

/// What L1 does with a write that misses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMissPolicy {
    /// Install the block and mark it dirty.
    #[default]
    Allocate,
    /// Forward the write to L2 without installing a line in L1.
    NoAllocate,
}

impl From<bool> for WriteMissPolicy {
    fn from(write_allocate: bool) -> Self {
        if write_allocate {
            Self::Allocate
        } else {
            Self::NoAllocate
        }
    }
}

/// Top-level cache.
#[derive(Clone, Debug)]
pub struct L1Cache {
    array: CacheArray,
    write_policy: WriteMissPolicy,
}

impl L1Cache {
    /// Creates an L1 cache from its configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is invalid.
    pub fn new(config: &L1Config) -> Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        Ok(Self {
            array: CacheArray::new(geometry, config.latency),
            write_policy: WriteMissPolicy::from(config.write_allocate),
        })
    }

    /// Write-miss policy fixed at construction.
    pub const fn write_policy(&self) -> WriteMissPolicy {
        self.write_policy
    }

    /// A miss of this kind installs the block in L1.
    const fn allocates(&self, is_write: bool) -> bool {
        !is_write || matches!(self.write_policy, WriteMissPolicy::Allocate)
    }

    /// Looks up `address`, forwarding to `next` on a miss.
    ///
    /// # Arguments
    ///
    /// * `address` - Accessed address.
    /// * `is_write` - Access is a store.
    /// * `now` - Recency stamp of the current access.
    /// * `next` - The L2 cache below.
    ///
    /// # Returns
    ///
    /// On a hit, the L1 latency. On a miss, L1 latency plus whatever L2 reports (which
    /// includes memory latency if L2 misses too).
    pub fn lookup(
        &mut self,
        address: Address,
        is_write: bool,
        now: u64,
        next: &mut L2Cache,
    ) -> AccessOutcome {
        let latency = self.array.latency();
        if self.array.probe(address, is_write, now) {
            trace!(%address, is_write, "L1 hit");
            return AccessOutcome {
                cycles: latency,
                hit: true,
                l2_hit: None,
            };
        }

        trace!(%address, is_write, "L1 miss");
        let below = next.lookup(address, is_write, now, self);
        if self.allocates(is_write) {
            self.insert(address, is_write, now, next);
        }

        AccessOutcome {
            cycles: latency + below.cycles,
            hit: false,
            l2_hit: Some(below.hit),
        }
    }

    /// Installs the block containing `address`.
    ///
    /// A dirty victim is written back into L2 before being overwritten. The new line is
    /// dirty only for an allocating write miss.
    pub fn insert(&mut self, address: Address, is_write: bool, now: u64, next: &mut L2Cache) {
        let loc = self.array.locate(address);
        let way = self.array.select_victim(loc.index);
        if let Some(victim) = self.array.evict(loc.index, way)
            && victim.dirty
            && !next.write_back(victim.address)
        {
            // Inclusion guarantees residency; reaching this means the levels diverged.
            warn!(address = %victim.address, "dirty L1 victim not resident in L2");
        }
        let dirty = is_write && matches!(self.write_policy, WriteMissPolicy::Allocate);
        self.array.install(loc, way, dirty, now);
    }

    /// Drops the line holding `address`, discarding its dirty state.
    ///
    /// # Returns
    ///
    /// `true` if the block was resident.
    pub fn invalidate_block(&mut self, address: Address) -> bool {
        self.array.invalidate(address).is_some()
    }

    /// Invalidates every line.
    pub fn reset(&mut self) {
        self.array.clear();
    }
}

impl CacheLevel for L1Cache {
    fn name(&self) -> &'static str {
        "L1"
    }

    fn array(&self) -> &CacheArray {
        &self.array
    }
}

impl UpperLevel for L1Cache {
    fn block_bytes(&self) -> u64 {
        self.array.geometry().block_bytes()
    }

    fn invalidate_block(&mut self, address: Address) -> bool {
        Self::invalidate_block(self, address)
    }
}
