//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by both cache levels. It includes:
//! 1. **Address Types:** The strong `Address` type and the tag/index decoder.
//! 2. **Constants:** Address width and exponent bounds.
//! 3. **Error Handling:** The construction-time `ConfigError`.

/// Address type and tag/index decomposition.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types raised while building a hierarchy.
pub mod error;

pub use addr::{Address, AddressDecoder, BlockLocation};
pub use constants::{ADDRESS_BITS, MAX_EXPONENT};
pub use error::ConfigError;
