//! Cache Geometry.
//!
//! Derives the shape of one cache level (capacity, block size, ways, sets) from log2
//! exponents and validates it once, at construction. Everything built on a `Geometry`
//! can then index sets and decode addresses without further checks.

use crate::common::{AddressDecoder, ConfigError, MAX_EXPONENT};

/// Validated shape of a single cache level.
///
/// Invariant: `num_sets = size_bytes / (block_bytes * associativity)` is an exact
/// power of two, at least one, and the derived address layout keeps one or more tag bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    size_bytes: u64,
    block_bytes: u64,
    associativity: usize,
    num_sets: usize,
    decoder: AddressDecoder,
}

/// Checks one exponent and returns it as an unsigned shift amount.
fn exponent(field: &'static str, value: i32) -> Result<u32, ConfigError> {
    let shift = u32::try_from(value).map_err(|_| ConfigError::NegativeExponent { field, value })?;
    if shift > MAX_EXPONENT {
        return Err(ConfigError::ExponentTooLarge {
            field,
            value,
            max: MAX_EXPONENT,
        });
    }
    Ok(shift)
}

impl Geometry {
    /// Builds a geometry from log2 exponents.
    ///
    /// # Arguments
    ///
    /// * `size_log2` - log2 of the total capacity in bytes.
    /// * `block_log2` - log2 of the block size in bytes.
    /// * `assoc_log2` - log2 of the number of ways per set.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NegativeExponent`] if any exponent is negative.
    /// - [`ConfigError::ExponentTooLarge`] if any exponent exceeds the address width.
    /// - [`ConfigError::UnevenSets`] if `block * assoc` exceeds the capacity, i.e. the
    ///   capacity cannot be divided into at least one whole set.
    /// - [`ConfigError::NoTagBits`] if the address layout leaves no tag bits.
    pub fn from_exponents(
        size_log2: i32,
        block_log2: i32,
        assoc_log2: i32,
    ) -> Result<Self, ConfigError> {
        let size = exponent("size", size_log2)?;
        let block = exponent("block size", block_log2)?;
        let assoc = exponent("associativity", assoc_log2)?;

        let size_bytes = 1u64 << size;
        let set_shift = block + assoc;
        if set_shift > size {
            return Err(ConfigError::UnevenSets {
                size_bytes,
                set_bytes: 1u64 << set_shift,
            });
        }

        let block_bytes = 1u64 << block;
        let num_sets = 1u64 << (size - set_shift);
        let decoder = AddressDecoder::new(block_bytes, num_sets)?;

        Ok(Self {
            size_bytes,
            block_bytes,
            associativity: 1usize << assoc,
            num_sets: num_sets as usize,
            decoder,
        })
    }

    /// Total capacity in bytes.
    #[inline]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Block (line) size in bytes.
    #[inline]
    pub const fn block_bytes(&self) -> u64 {
        self.block_bytes
    }

    /// Number of ways per set.
    #[inline]
    pub const fn associativity(&self) -> usize {
        self.associativity
    }

    /// Number of sets.
    #[inline]
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Address decoder matching this geometry.
    #[inline]
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }
}
