//! Global Simulator Constants.
//!
//! Address width and exponent bounds used by the decoder and the geometry checks, and the
//! starting value of the recency clock.

/// Width of a simulated address in bits.
pub const ADDRESS_BITS: u32 = 32;

/// Largest accepted size/block/associativity exponent.
///
/// A cache larger than the 32-bit address space cannot be indexed, so exponents are
/// bounded by the address width.
pub const MAX_EXPONENT: u32 = ADDRESS_BITS - 1;

/// Initial value of the recency clock; every access stamps lines with a strictly larger value.
pub const CLOCK_START: u64 = 0;
