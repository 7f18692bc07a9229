
/// Recency clock and write-back counter.
pub mod counters;
