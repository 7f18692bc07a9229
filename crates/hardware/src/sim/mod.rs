//! Trace ingestion and the driver loop.
//!
//! Provides utilities for reading access traces and replaying them through a hierarchy
//! while collecting statistics.

/// Trace parsing and loading.
pub mod trace;

/// Driver that replays traces and collects statistics.
pub mod simulator;

pub use simulator::{Simulator, run_trace};
pub use trace::{TraceError, TraceReader, TraceRecord, load_trace, parse_trace};
