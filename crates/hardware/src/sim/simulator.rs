//! Simulator: owns the hierarchy and the statistics side-by-side.
//!
//! The driver loop is deliberately thin: it feeds each trace record to
//! [`Hierarchy::access`] and records the outcome. Everything with algorithmic content
//! lives in the hierarchy.

use std::io::BufRead;

use tracing::info;

use super::trace::{TraceError, TraceReader, TraceRecord};
use crate::common::ConfigError;
use crate::config::HierarchyConfig;
use crate::hierarchy::Hierarchy;
use crate::stats::SimStats;

/// Top-level simulator: cache hierarchy + per-run statistics.
#[derive(Debug)]
pub struct Simulator {
    /// The simulated hierarchy.
    pub hierarchy: Hierarchy,
    /// Statistics accumulated so far.
    pub stats: SimStats,
}

impl Simulator {
    /// Creates a simulator around an already-built hierarchy.
    pub fn new(hierarchy: Hierarchy) -> Self {
        Self {
            hierarchy,
            stats: SimStats::default(),
        }
    }

    /// Builds the hierarchy described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised while building the hierarchy.
    pub fn from_config(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(Hierarchy::new(config)?))
    }

    /// Runs one access and records it.
    pub fn step(&mut self, record: TraceRecord) {
        let outcome = self.hierarchy.access_at(record.address, record.is_write);
        self.stats.record(&outcome, record.is_write);
    }

    /// Runs every record in order.
    pub fn run<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = TraceRecord>,
    {
        for record in records {
            self.step(record);
        }
    }

    /// Streams records from `reader` until it is exhausted.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed line or I/O failure; accesses before it stay recorded.
    pub fn run_reader<R: BufRead>(&mut self, reader: R) -> Result<(), TraceError> {
        for record in TraceReader::new(reader) {
            self.step(record?);
        }
        Ok(())
    }

    /// Captures the hierarchy counters and returns the final statistics.
    pub fn finish(mut self) -> SimStats {
        self.stats.capture(&self.hierarchy);
        info!(
            accesses = self.stats.accesses,
            writebacks = self.stats.writebacks,
            "simulation finished"
        );
        self.stats
    }
}

/// Runs `records` through `hierarchy` and returns the statistics of that run.
///
/// The hierarchy keeps its state afterwards, so consecutive calls continue where the
/// previous run stopped. Write-backs are counted for this run only.
pub fn run_trace<I>(hierarchy: &mut Hierarchy, records: I) -> SimStats
where
    I: IntoIterator<Item = TraceRecord>,
{
    let baseline = hierarchy.writebacks();
    let mut stats = SimStats::default();
    for record in records {
        let outcome = hierarchy.access_at(record.address, record.is_write);
        stats.record(&outcome, record.is_write);
    }
    stats.capture(hierarchy);
    stats.writebacks -= baseline;
    stats
}
