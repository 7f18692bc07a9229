//! L2 Cache.
//!
//! The second level sits between L1 and main memory. It is always write-allocate and
//! write-back, and it owns two side effects of eviction:
//! 1. **Inclusion:** Any block leaving L2 is invalidated in the upper level, so every block
//!    held by L1 is also held by L2.
//! 2. **Write-back accounting:** Evicting a dirty line counts one flush to memory.
//!
//! # Line states
//!
//! ```text
//! INVALID ──insert──▶ VALID_CLEAN | VALID_DIRTY
//! VALID_CLEAN ──write hit / L1 write-back──▶ VALID_DIRTY
//! VALID_* ──eviction──▶ INVALID   (L1 invalidation, +1 write-back if dirty)
//! ```

use std::fmt;

use tracing::{debug, trace};

use super::{CacheArray, CacheLevel, Eviction, LookupResult, UpperLevel, WritebackCounter};
use crate::common::{Address, ConfigError};
use crate::config::L2Config;
use crate::memory::MainMemory;

/// Memory-backed second-level cache.
pub struct L2Cache {
    array: CacheArray,
    memory: Box<dyn MainMemory>,
    writebacks: WritebackCounter,
}

impl L2Cache {
    /// Creates an L2 cache backed by `memory`.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry exponents and latency.
    /// * `memory` - Backing store consulted on misses.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is invalid.
    pub fn new(config: &L2Config, memory: Box<dyn MainMemory>) -> Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        Ok(Self {
            array: CacheArray::new(geometry, config.latency),
            memory,
            writebacks: WritebackCounter::new(),
        })
    }

    /// Looks up `address`, fetching it from memory on a miss.
    ///
    /// A hit refreshes recency, marks the line dirty on a write and costs the L2 latency.
    /// A miss costs L2 latency plus memory latency and installs the block (dirty when
    /// `is_write`), evicting a victim if the set is full.
    ///
    /// # Arguments
    ///
    /// * `address` - Accessed address.
    /// * `is_write` - Access is a store.
    /// * `now` - Recency stamp of the current access.
    /// * `upper` - Level above, invalidated when a victim is evicted.
    pub fn lookup(
        &mut self,
        address: Address,
        is_write: bool,
        now: u64,
        upper: &mut dyn UpperLevel,
    ) -> LookupResult {
        let latency = self.array.latency();
        if self.array.probe(address, is_write, now) {
            trace!(%address, is_write, "L2 hit");
            return LookupResult {
                cycles: latency,
                hit: true,
            };
        }

        let base = self.array.geometry().decoder().block_base(address);
        let cycles = latency + self.memory.access_latency(base);
        trace!(%address, is_write, cycles, "L2 miss");
        self.insert(address, is_write, now, upper);
        LookupResult { cycles, hit: false }
    }

    /// Installs the block containing `address`.
    ///
    /// If the chosen victim is valid, the upper level drops every block inside it and a
    /// dirty victim counts as one write-back, before the new block overwrites the slot.
    pub fn insert(
        &mut self,
        address: Address,
        is_write: bool,
        now: u64,
        upper: &mut dyn UpperLevel,
    ) {
        let loc = self.array.locate(address);
        let way = self.array.select_victim(loc.index);
        if let Some(victim) = self.array.evict(loc.index, way) {
            self.retire(victim, upper);
        }
        self.array.install(loc, way, is_write, now);
    }

    /// Eviction policy: back-invalidate the upper level, then flush if dirty.
    fn retire(&mut self, victim: Eviction, upper: &mut dyn UpperLevel) {
        let block = self.array.geometry().block_bytes();
        let step = upper.block_bytes().max(1);
        let base = u64::from(victim.address.val());
        let mut offset = 0;
        while offset < block {
            let target = Address::new((base + offset) as u32);
            if upper.invalidate_block(target) {
                debug!(address = %target, "inclusion: invalidated block in L1");
            }
            offset += step;
        }

        if victim.dirty {
            self.writebacks.record();
            debug!(address = %victim.address, total = self.writebacks.count(), "L2 write-back");
        } else {
            debug!(address = %victim.address, "L2 clean eviction");
        }
    }

    /// Absorbs a dirty block written back from L1.
    ///
    /// The resident copy is marked dirty; its recency is left unchanged because the
    /// write-back is not a demand access.
    ///
    /// # Returns
    ///
    /// `true` if the block was resident in L2.
    pub fn write_back(&mut self, address: Address) -> bool {
        self.array.mark_dirty(address)
    }

    /// Number of dirty lines evicted so far.
    pub const fn writebacks(&self) -> u64 {
        self.writebacks.count()
    }

    /// Invalidates every line and clears the write-back counter.
    pub fn reset(&mut self) {
        self.array.clear();
        self.writebacks.reset();
    }
}

impl CacheLevel for L2Cache {
    fn name(&self) -> &'static str {
        "L2"
    }

    fn array(&self) -> &CacheArray {
        &self.array
    }
}

impl fmt::Debug for L2Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("L2Cache")
            .field("geometry", self.array.geometry())
            .field("latency", &self.array.latency())
            .field("valid_lines", &self.array.valid_lines())
            .field("writebacks", &self.writebacks.count())
            .finish_non_exhaustive()
    }
}
