//! Set-Associative Cache Levels.
//!
//! This module implements the storage model shared by both levels of the hierarchy and the
//! two concrete levels built on it. It models hits, misses, true-LRU replacement,
//! write-back dirty tracking, and inclusion between L1 and L2.
//!
//! # Structure
//!
//! - [`CacheArray`]: sets of [`CacheLine`]s plus the primitives every level uses
//!   (probe, victim selection, eviction, install, invalidation).
//! - [`CacheLevel`]: read-only contract both levels expose for inspection and reporting.
//! - [`L1Cache`]: top level with a configurable write-miss policy.
//! - [`L2Cache`]: memory-backed level that enforces inclusion and counts write-backs.

/// Level shape derived from log2 exponents.
pub mod geometry;

/// Recency clock and write-back counter.
pub mod counters;

/// Top-level cache.
pub mod l1;

/// Second-level, memory-backed cache.
pub mod l2;

pub use counters::{RecencyClock, WritebackCounter};
pub use geometry::Geometry;
pub use l1::{L1Cache, WriteMissPolicy};
pub use l2::L2Cache;

use crate::common::{Address, BlockLocation};

/// One way of a cache set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Line holds a block.
    pub valid: bool,
    /// Block was modified since it was installed in this level.
    pub dirty: bool,
    /// Tag of the resident block.
    pub tag: u32,
    /// Recency-clock stamp of the last access that touched this line.
    pub last_used: u64,
}

/// Fixed-length group of lines sharing a set index.
///
/// Invariant: no two valid lines share a tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    fn new(ways: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); ways],
        }
    }

    /// The ways of this set, in slot order.
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Slot of the valid line holding `tag`, if any.
    pub fn find(&self, tag: u32) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Chooses the slot to fill.
    ///
    /// The first invalid slot wins. With every slot valid, the line with the smallest
    /// `last_used` stamp is chosen; `min_by_key` keeps the first of equal minima, so ties
    /// go to the lowest slot.
    pub fn victim(&self) -> usize {
        if let Some(free) = self.lines.iter().position(|line| !line.valid) {
            return free;
        }
        self.lines
            .iter()
            .enumerate()
            .min_by_key(|(_, line)| line.last_used)
            .map_or(0, |(way, _)| way)
    }
}

/// A valid line removed from a set to make room for another block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eviction {
    /// Block-aligned address reconstructed from the victim's tag and set index.
    pub address: Address,
    /// Victim held modified data.
    pub dirty: bool,
}

/// Result of a lookup in a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupResult {
    /// Cycles spent in this level and everything below it.
    pub cycles: u64,
    /// Block was present in this level.
    pub hit: bool,
}

/// Result of one access through the whole hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    /// Total latency of the access in cycles.
    pub cycles: u64,
    /// L1 hit.
    pub hit: bool,
    /// L2 hit, or `None` when the access never left L1.
    pub l2_hit: Option<bool>,
}

impl AccessOutcome {
    /// Total latency as a floating-point cycle count, for averaging.
    pub const fn total_cycles(&self) -> f64 {
        self.cycles as f64
    }

    /// The access had to go all the way to main memory.
    pub const fn reached_memory(&self) -> bool {
        matches!(self.l2_hit, Some(false))
    }
}

/// Sets of lines for one level together with its latency.
///
/// This is the storage both levels are built on. Lookup and insertion policy live in
/// [`L1Cache`] and [`L2Cache`]; the array only offers the mechanics.
#[derive(Clone, Debug)]
pub struct CacheArray {
    geometry: Geometry,
    latency: u64,
    sets: Vec<CacheSet>,
}

impl CacheArray {
    /// Creates an array with every line invalid.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Validated shape of the level.
    /// * `latency` - Fixed access latency in cycles.
    pub fn new(geometry: Geometry, latency: u64) -> Self {
        let sets = (0..geometry.num_sets())
            .map(|_| CacheSet::new(geometry.associativity()))
            .collect();
        Self {
            geometry,
            latency,
            sets,
        }
    }

    /// Shape of this level.
    #[inline]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Access latency in cycles.
    #[inline]
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// All sets in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Tag and set index of `address` in this level.
    #[inline]
    pub const fn locate(&self, address: Address) -> BlockLocation {
        self.geometry.decoder().decompose(address)
    }

    /// The line holding `address`, if resident.
    pub fn line(&self, address: Address) -> Option<&CacheLine> {
        let loc = self.locate(address);
        let set = &self.sets[loc.index as usize];
        set.find(loc.tag).map(|way| &set.lines[way])
    }

    /// `address` is resident in a valid line.
    pub fn contains(&self, address: Address) -> bool {
        self.line(address).is_some()
    }

    /// Dirty state of the line holding `address`, or `None` if not resident.
    pub fn is_dirty(&self, address: Address) -> Option<bool> {
        self.line(address).map(|line| line.dirty)
    }

    /// Number of valid lines across all sets.
    pub fn valid_lines(&self) -> usize {
        self.sets
            .iter()
            .map(|set| set.lines.iter().filter(|line| line.valid).count())
            .sum()
    }

    /// Hit path shared by both levels.
    ///
    /// On a hit the line's recency is refreshed to `now` and, for a write, the line is
    /// marked dirty (write-back: nothing is propagated downward here).
    ///
    /// # Returns
    ///
    /// `true` on a hit, `false` if the block is not resident (no state changes).
    pub(crate) fn probe(&mut self, address: Address, is_write: bool, now: u64) -> bool {
        let loc = self.locate(address);
        let set = &mut self.sets[loc.index as usize];
        match set.find(loc.tag) {
            Some(way) => {
                let line = &mut set.lines[way];
                line.last_used = now;
                if is_write {
                    line.dirty = true;
                }
                true
            }
            None => false,
        }
    }

    /// Slot that an insertion into `index` would fill.
    pub fn select_victim(&self, index: u32) -> usize {
        self.sets[index as usize].victim()
    }

    /// Removes the line in `(index, way)` if it is valid.
    ///
    /// # Returns
    ///
    /// The evicted block, with its address reconstructed from the stored tag, or `None`
    /// if the slot was already invalid.
    pub(crate) fn evict(&mut self, index: u32, way: usize) -> Option<Eviction> {
        let line = &mut self.sets[index as usize].lines[way];
        if !line.valid {
            return None;
        }
        let eviction = Eviction {
            address: self.geometry.decoder().reconstruct(line.tag, index),
            dirty: line.dirty,
        };
        *line = CacheLine::default();
        Some(eviction)
    }

    /// Installs a block into `(loc.index, way)`.
    pub(crate) fn install(&mut self, loc: BlockLocation, way: usize, dirty: bool, now: u64) {
        self.sets[loc.index as usize].lines[way] = CacheLine {
            valid: true,
            dirty,
            tag: loc.tag,
            last_used: now,
        };
    }

    /// Clears the line holding `address`.
    ///
    /// # Returns
    ///
    /// The line as it was before invalidation, or `None` if the block was not resident.
    pub(crate) fn invalidate(&mut self, address: Address) -> Option<CacheLine> {
        let loc = self.locate(address);
        let set = &mut self.sets[loc.index as usize];
        let way = set.find(loc.tag)?;
        Some(std::mem::take(&mut set.lines[way]))
    }

    /// Marks the line holding `address` dirty without touching its recency.
    ///
    /// # Returns
    ///
    /// `true` if the block was resident.
    pub(crate) fn mark_dirty(&mut self, address: Address) -> bool {
        let loc = self.locate(address);
        let set = &mut self.sets[loc.index as usize];
        match set.find(loc.tag) {
            Some(way) => {
                set.lines[way].dirty = true;
                true
            }
            None => false,
        }
    }

    /// Invalidates every line.
    pub(crate) fn clear(&mut self) {
        for set in &mut self.sets {
            set.lines.fill(CacheLine::default());
        }
    }
}

/// Read-only view shared by both cache levels.
pub trait CacheLevel {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Underlying storage.
    fn array(&self) -> &CacheArray;

    /// Access latency in cycles.
    fn latency(&self) -> u64 {
        self.array().latency()
    }

    /// Shape of the level.
    fn geometry(&self) -> &Geometry {
        self.array().geometry()
    }

    /// `address` is resident.
    fn contains(&self, address: Address) -> bool {
        self.array().contains(address)
    }

    /// Dirty state of `address`, or `None` if not resident.
    fn is_dirty(&self, address: Address) -> Option<bool> {
        self.array().is_dirty(address)
    }

    /// Number of valid lines.
    fn valid_lines(&self) -> usize {
        self.array().valid_lines()
    }
}

/// The level above L2, as seen by L2 when it evicts a block.
///
/// L2 calls back into it to keep the inclusion property: a block leaving L2 must leave
/// the upper level too.
pub trait UpperLevel {
    /// Block size of the upper level in bytes.
    fn block_bytes(&self) -> u64;

    /// Drops the upper-level block containing `address`, if resident.
    ///
    /// # Returns
    ///
    /// `true` if a line was invalidated.
    fn invalidate_block(&mut self, address: Address) -> bool;
}
