/// Trace line parsing and file loading.
pub mod trace;

/// Replay loop and statistics capture.
pub mod simulator;
