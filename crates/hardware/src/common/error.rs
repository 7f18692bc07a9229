//! Configuration error definitions.
//!
//! Construction of a cache level, or of a whole hierarchy, is the only fallible step in
//! the core. Once built, lookups, insertions and invalidations are total over the 32-bit
//! address space. This module defines the error raised when a geometry is rejected.

use thiserror::Error;

/// Reasons a cache geometry or hierarchy layout is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A size, block or associativity exponent was negative.
    #[error("{field} exponent must be non-negative, got {value}")]
    NegativeExponent {
        /// Which exponent was rejected.
        field: &'static str,
        /// The offending value.
        value: i32,
    },

    /// An exponent would describe a structure wider than the address space.
    #[error("{field} exponent {value} exceeds the maximum of {max}")]
    ExponentTooLarge {
        /// Which exponent was rejected.
        field: &'static str,
        /// The offending value.
        value: i32,
        /// Largest accepted exponent.
        max: u32,
    },

    /// `block_bytes * associativity` does not divide the cache size into at least one set.
    #[error("cache of {size_bytes} bytes cannot be split into sets of {set_bytes} bytes")]
    UnevenSets {
        /// Total cache capacity in bytes.
        size_bytes: u64,
        /// Bytes per set (`block_bytes * associativity`).
        set_bytes: u64,
    },

    /// A block size or set count handed to the decoder was not a power of two.
    #[error("{what} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Which quantity was rejected.
        what: &'static str,
        /// The offending value.
        value: u64,
    },

    /// Offset and index fields consume the whole address, leaving no tag bits.
    #[error("geometry leaves no tag bits ({offset_bits} offset + {index_bits} index bits)")]
    NoTagBits {
        /// Block-offset bits.
        offset_bits: u32,
        /// Set-index bits.
        index_bits: u32,
    },

    /// The upper level's block is larger than the lower level's, so inclusion cannot hold.
    #[error("L1 block size ({l1_block} B) must not exceed L2 block size ({l2_block} B)")]
    BlockSizeMismatch {
        /// L1 block size in bytes.
        l1_block: u64,
        /// L2 block size in bytes.
        l2_block: u64,
    },
}
