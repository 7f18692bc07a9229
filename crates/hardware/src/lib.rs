//! Two-level cache hierarchy simulator library.
//!
//! This crate estimates memory-access latency for a stream of `(address, is_write)`
//! accesses through an inclusive L1/L2 hierarchy:
//! 1. **Cache levels:** Set-associative storage, true-LRU replacement, write-back and
//!    write-allocate policies, inclusion enforced by L2 back-invalidation.
//! 2. **Hierarchy:** Owns both levels, the recency clock and the memory model; one call
//!    per access.
//! 3. **Simulation:** Trace parsing, the replay loop, configuration, and statistics.

/// Common types and constants (addresses, decoder, errors).
pub mod common;
/// Hierarchy configuration (defaults and per-level structures).
pub mod config;
/// Cache levels and their shared storage model.
pub mod cache;
/// The L1 + L2 + memory assembly.
pub mod hierarchy;
/// Main memory latency models.
pub mod memory;
/// Trace loading and the driver loop.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `HierarchyConfig::default()` or deserialize from JSON.
pub use crate::config::HierarchyConfig;
/// Construction-time error for invalid geometries.
pub use crate::common::{Address, ConfigError};
/// The simulated hierarchy; construct with `Hierarchy::new`.
pub use crate::hierarchy::Hierarchy;
/// Result of one access.
pub use crate::cache::AccessOutcome;
/// Per-run statistics.
pub use crate::stats::SimStats;
