//! Configuration system for the cache hierarchy simulator.
//!
//! This module defines all configuration structures used to parameterize a hierarchy.
//! It provides:
//! 1. **Defaults:** Baseline geometry and latency constants for L1, L2 and main memory.
//! 2. **Structures:** Per-level config (`L1Config`, `L2Config`), `MemoryConfig`, and the
//!    root `HierarchyConfig`.
//! 3. **Validation:** `geometry()` turns raw log2 exponents into a checked [`Geometry`].
//!
//! Sizes, block sizes and associativities are given as log2 exponents, so every derived
//! quantity is a power of two. Configuration is supplied as JSON (see
//! [`HierarchyConfig::from_json`]) or built with `HierarchyConfig::default()`.

use serde::Deserialize;

use crate::cache::Geometry;
use crate::common::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hierarchy when a field is not explicitly given.
pub mod defaults {
    /// L1 capacity exponent (2^8 = 256 bytes).
    pub const L1_SIZE_LOG2: i32 = 8;

    /// L1 block size exponent (2^4 = 16 bytes).
    pub const L1_BLOCK_LOG2: i32 = 4;

    /// L1 associativity exponent (2^0 = direct-mapped).
    pub const L1_ASSOC_LOG2: i32 = 0;

    /// L1 access latency in cycles.
    pub const L1_LATENCY: u64 = 1;

    /// Whether an L1 write miss installs the block.
    pub const L1_WRITE_ALLOCATE: bool = true;

    /// L2 capacity exponent (2^10 = 1 KiB).
    pub const L2_SIZE_LOG2: i32 = 10;

    /// L2 block size exponent (2^4 = 16 bytes).
    pub const L2_BLOCK_LOG2: i32 = 4;

    /// L2 associativity exponent (2^1 = 2-way).
    pub const L2_ASSOC_LOG2: i32 = 1;

    /// L2 access latency in cycles.
    pub const L2_LATENCY: u64 = 10;

    /// Main memory access latency in cycles.
    pub const MEMORY_LATENCY: u64 = 100;
}

/// Root configuration structure containing all hierarchy settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use cachesim_core::config::HierarchyConfig;
///
/// let config = HierarchyConfig::default();
/// assert_eq!(config.l1.size_log2, 8);
/// assert!(config.l1.write_allocate);
/// assert_eq!(config.memory.latency, 100);
/// ```
///
/// Deserializing from JSON, with omitted fields falling back to defaults:
///
/// ```
/// use cachesim_core::config::HierarchyConfig;
///
/// let json = r#"{
///     "l1": { "size_log2": 12, "assoc_log2": 2, "write_allocate": false },
///     "l2": { "size_log2": 16, "latency": 12 },
///     "memory": { "latency": 200 }
/// }"#;
///
/// let config = HierarchyConfig::from_json(json).unwrap();
/// assert_eq!(config.l1.size_log2, 12);
/// assert_eq!(config.l1.block_log2, 4);
/// assert!(!config.l1.write_allocate);
/// assert_eq!(config.l2.latency, 12);
/// assert_eq!(config.memory.latency, 200);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyConfig {
    /// Top-level cache
    #[serde(default)]
    pub l1: L1Config,
    /// Second-level cache, inclusive of L1
    #[serde(default)]
    pub l2: L2Config,
    /// Backing store consulted on L2 misses
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl HierarchyConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is malformed or names unknown fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// L1 cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct L1Config {
    /// log2 of the capacity in bytes
    #[serde(default = "L1Config::default_size_log2")]
    pub size_log2: i32,

    /// log2 of the block size in bytes
    #[serde(default = "L1Config::default_block_log2")]
    pub block_log2: i32,

    /// log2 of the number of ways
    #[serde(default = "L1Config::default_assoc_log2")]
    pub assoc_log2: i32,

    /// Access latency in cycles
    #[serde(default = "L1Config::default_latency")]
    pub latency: u64,

    /// Install the block on a write miss (write-allocate) instead of bypassing L1
    #[serde(default = "L1Config::default_write_allocate")]
    pub write_allocate: bool,
}

impl L1Config {
    const fn default_size_log2() -> i32 {
        defaults::L1_SIZE_LOG2
    }

    const fn default_block_log2() -> i32 {
        defaults::L1_BLOCK_LOG2
    }

    const fn default_assoc_log2() -> i32 {
        defaults::L1_ASSOC_LOG2
    }

    const fn default_latency() -> u64 {
        defaults::L1_LATENCY
    }

    const fn default_write_allocate() -> bool {
        defaults::L1_WRITE_ALLOCATE
    }

    /// Validates the exponents and derives the level geometry.
    ///
    /// # Errors
    ///
    /// Propagates the [`ConfigError`] raised by [`Geometry::from_exponents`].
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::from_exponents(self.size_log2, self.block_log2, self.assoc_log2)
    }
}

impl Default for L1Config {
    fn default() -> Self {
        Self {
            size_log2: defaults::L1_SIZE_LOG2,
            block_log2: defaults::L1_BLOCK_LOG2,
            assoc_log2: defaults::L1_ASSOC_LOG2,
            latency: defaults::L1_LATENCY,
            write_allocate: defaults::L1_WRITE_ALLOCATE,
        }
    }
}

/// L2 cache configuration.
///
/// L2 is always write-allocate and write-back, so it carries no policy switch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct L2Config {
    /// log2 of the capacity in bytes
    #[serde(default = "L2Config::default_size_log2")]
    pub size_log2: i32,

    /// log2 of the block size in bytes
    #[serde(default = "L2Config::default_block_log2")]
    pub block_log2: i32,

    /// log2 of the number of ways
    #[serde(default = "L2Config::default_assoc_log2")]
    pub assoc_log2: i32,

    /// Access latency in cycles
    #[serde(default = "L2Config::default_latency")]
    pub latency: u64,
}

impl L2Config {
    const fn default_size_log2() -> i32 {
        defaults::L2_SIZE_LOG2
    }

    const fn default_block_log2() -> i32 {
        defaults::L2_BLOCK_LOG2
    }

    const fn default_assoc_log2() -> i32 {
        defaults::L2_ASSOC_LOG2
    }

    const fn default_latency() -> u64 {
        defaults::L2_LATENCY
    }

    /// Validates the exponents and derives the level geometry.
    ///
    /// # Errors
    ///
    /// Propagates the [`ConfigError`] raised by [`Geometry::from_exponents`].
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::from_exponents(self.size_log2, self.block_log2, self.assoc_log2)
    }
}

impl Default for L2Config {
    fn default() -> Self {
        Self {
            size_log2: defaults::L2_SIZE_LOG2,
            block_log2: defaults::L2_BLOCK_LOG2,
            assoc_log2: defaults::L2_ASSOC_LOG2,
            latency: defaults::L2_LATENCY,
        }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Fixed access latency in cycles
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,
}

impl MemoryConfig {
    /// Returns the default memory latency in cycles.
    const fn default_latency() -> u64 {
        defaults::MEMORY_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            latency: defaults::MEMORY_LATENCY,
        }
    }
}
