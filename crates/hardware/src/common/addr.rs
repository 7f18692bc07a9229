//! Address types and tag/index decomposition.
//!
//! This module defines the strong 32-bit address type used by every cache level and the
//! decoder that splits it into cache coordinates. It provides the following:
//! 1. **Type Safety:** `Address` keeps raw trace values apart from tags and set indices.
//! 2. **Decomposition:** `AddressDecoder::decompose` maps an address to `(tag, index)`.
//! 3. **Reconstruction:** `AddressDecoder::reconstruct` rebuilds the block-aligned base
//!    address of a resident line, used when an evicted block must be located in another level.

use std::fmt;

use super::constants::ADDRESS_BITS;
use super::error::ConfigError;

/// A byte address in the simulated 32-bit address space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub u32);

impl Address {
    /// Creates a new address from a raw 32-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw 32-bit address value.
    ///
    /// # Returns
    ///
    /// A new `Address` instance wrapping the provided value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }
}

impl From<u32> for Address {
    fn from(addr: u32) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Cache coordinates of a block: the tag stored in the line and the set it lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockLocation {
    /// High-order address bits stored alongside the line.
    pub tag: u32,
    /// Set index selected by the middle address bits.
    pub index: u32,
}

/// Splits addresses into `(tag, index)` for one cache geometry.
///
/// The layout of a 32-bit address is `[ tag | index | offset ]` where
/// `offset_bits = log2(block_bytes)` and `index_bits = log2(num_sets)`.
/// At least one tag bit must remain, so `offset_bits + index_bits < 32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
}

impl AddressDecoder {
    /// Creates a decoder for a level with the given block size and set count.
    ///
    /// # Arguments
    ///
    /// * `block_bytes` - Block (line) size in bytes; must be a power of two.
    /// * `num_sets` - Number of sets; must be a power of two.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] if either argument is not a power of two, and
    /// [`ConfigError::NoTagBits`] if the offset and index fields leave no room for a tag.
    pub const fn new(block_bytes: u64, num_sets: u64) -> Result<Self, ConfigError> {
        if !block_bytes.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                what: "block size",
                value: block_bytes,
            });
        }
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                what: "set count",
                value: num_sets,
            });
        }

        let offset_bits = block_bytes.trailing_zeros();
        let index_bits = num_sets.trailing_zeros();
        if offset_bits + index_bits >= ADDRESS_BITS {
            return Err(ConfigError::NoTagBits {
                offset_bits,
                index_bits,
            });
        }

        Ok(Self {
            offset_bits,
            index_bits,
        })
    }

    /// Number of block-offset bits.
    #[inline]
    pub const fn offset_bits(self) -> u32 {
        self.offset_bits
    }

    /// Number of set-index bits.
    #[inline]
    pub const fn index_bits(self) -> u32 {
        self.index_bits
    }

    /// Number of tag bits; always at least one.
    #[inline]
    pub const fn tag_bits(self) -> u32 {
        ADDRESS_BITS - self.offset_bits - self.index_bits
    }

    #[inline]
    const fn index_mask(self) -> u32 {
        // index_bits <= 31, so the shift cannot overflow.
        (1u32 << self.index_bits) - 1
    }

    /// Splits an address into its tag and set index.
    ///
    /// # Arguments
    ///
    /// * `address` - Any 32-bit address; the block offset is discarded.
    ///
    /// # Returns
    ///
    /// The `BlockLocation` holding `tag = addr >> (offset + index)` and
    /// `index = (addr >> offset) & (2^index - 1)`.
    #[inline]
    pub const fn decompose(self, address: Address) -> BlockLocation {
        BlockLocation {
            tag: address.0 >> (self.offset_bits + self.index_bits),
            index: (address.0 >> self.offset_bits) & self.index_mask(),
        }
    }

    /// Rebuilds the block-aligned base address of `(tag, index)`.
    ///
    /// Inverse of [`decompose`](Self::decompose) with the offset taken as zero:
    /// `decompose(reconstruct(t, i)) == (t, i)` for every in-range tag and index.
    ///
    /// # Arguments
    ///
    /// * `tag` - Tag as stored in a cache line.
    /// * `index` - Set index of that line.
    ///
    /// # Returns
    ///
    /// The address of the first byte of the block.
    #[inline]
    pub const fn reconstruct(self, tag: u32, index: u32) -> Address {
        let tag_part = tag << (self.offset_bits + self.index_bits);
        let index_part = (index & self.index_mask()) << self.offset_bits;
        Address(tag_part | index_part)
    }

    /// Returns `address` with its block offset cleared.
    #[inline]
    pub const fn block_base(self, address: Address) -> Address {
        Address(address.0 & !((1u32 << self.offset_bits) - 1))
    }
}
