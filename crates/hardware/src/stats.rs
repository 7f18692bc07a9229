//! Simulation statistics collection and reporting.
//!
//! This module aggregates per-access outcomes for one run. It provides:
//! 1. **Access mix:** Total accesses split into reads and writes.
//! 2. **Hit/miss counts:** For L1 and, for accesses that reached it, L2.
//! 3. **Latency:** Total cycles and the average access time.
//! 4. **Write-backs:** Dirty L2 evictions and the bytes they flushed to memory.

use std::time::Instant;

use crate::cache::{AccessOutcome, CacheLevel};
use crate::hierarchy::Hierarchy;

/// Statistics for one simulated access stream.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total accesses recorded.
    pub accesses: u64,
    /// Read accesses.
    pub reads: u64,
    /// Write accesses.
    pub writes: u64,

    /// L1 hit count.
    pub l1_hits: u64,
    /// L1 miss count.
    pub l1_misses: u64,
    /// L2 hit count (only accesses that missed L1 reach L2).
    pub l2_hits: u64,
    /// L2 miss count.
    pub l2_misses: u64,

    /// Sum of access latencies in cycles.
    pub total_cycles: u64,

    /// Dirty lines evicted from L2.
    pub writebacks: u64,
    /// L2 block size used to convert write-backs into bytes.
    pub block_bytes: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            accesses: 0,
            reads: 0,
            writes: 0,
            l1_hits: 0,
            l1_misses: 0,
            l2_hits: 0,
            l2_misses: 0,
            total_cycles: 0,
            writebacks: 0,
            block_bytes: 0,
        }
    }
}

/// `part / whole`, or zero when nothing was counted.
const fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

impl SimStats {
    /// Adds one access outcome.
    ///
    /// # Arguments
    ///
    /// * `outcome` - Result returned by [`Hierarchy::access`].
    /// * `is_write` - The access was a store.
    pub const fn record(&mut self, outcome: &AccessOutcome, is_write: bool) {
        self.accesses += 1;
        if is_write {
            self.writes += 1;
        } else {
            self.reads += 1;
        }

        if outcome.hit {
            self.l1_hits += 1;
        } else {
            self.l1_misses += 1;
        }
        match outcome.l2_hit {
            Some(true) => self.l2_hits += 1,
            Some(false) => self.l2_misses += 1,
            None => {}
        }

        self.total_cycles += outcome.cycles;
    }

    /// Copies the hierarchy-owned counters (write-backs, L2 block size) into the stats.
    ///
    /// Call once at the end of a run.
    pub fn capture(&mut self, hierarchy: &Hierarchy) {
        self.writebacks = hierarchy.writebacks();
        self.block_bytes = hierarchy.l2().geometry().block_bytes();
    }

    /// Fraction of accesses that missed L1.
    pub const fn l1_miss_rate(&self) -> f64 {
        ratio(self.l1_misses, self.l1_hits + self.l1_misses)
    }

    /// Fraction of L2 lookups that missed (local miss rate).
    pub const fn l2_miss_rate(&self) -> f64 {
        ratio(self.l2_misses, self.l2_hits + self.l2_misses)
    }

    /// Mean latency per access in cycles.
    pub const fn average_access_time(&self) -> f64 {
        ratio(self.total_cycles, self.accesses)
    }

    /// Bytes flushed to memory by dirty L2 evictions.
    pub const fn bytes_written_back(&self) -> u64 {
        self.writebacks * self.block_bytes
    }

    /// One-line summary: `L1miss=<rate> L2miss=<rate> AccTimeAvg=<cycles>`.
    pub fn summary(&self) -> String {
        format!(
            "L1miss={:.03} L2miss={:.03} AccTimeAvg={:.03}",
            self.l1_miss_rate(),
            self.l2_miss_rate(),
            self.average_access_time()
        )
    }

    /// Prints the full report to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let print_level = |name: &str, hits: u64, misses: u64| {
            let total = hits + misses;
            println!(
                "  {:<6} accesses: {:<10} | hits: {:<10} | miss_rate: {:.2}%",
                name,
                total,
                hits,
                ratio(misses, total) * 100.0
            );
        };

        println!("\n==========================================================");
        println!("CACHE HIERARCHY SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_accesses             {}", self.accesses);
        println!(
            "  reads                  {} ({:.2}%)",
            self.reads,
            ratio(self.reads, self.accesses) * 100.0
        );
        println!(
            "  writes                 {} ({:.2}%)",
            self.writes,
            ratio(self.writes, self.accesses) * 100.0
        );
        println!("sim_cycles               {}", self.total_cycles);
        println!("avg_access_time          {:.3} cycles", self.average_access_time());
        println!("----------------------------------------------------------");
        println!("MEMORY HIERARCHY");
        print_level("L1", self.l1_hits, self.l1_misses);
        print_level("L2", self.l2_hits, self.l2_misses);
        println!("----------------------------------------------------------");
        println!("WRITE-BACKS");
        println!("  l2.writebacks          {}", self.writebacks);
        println!("  l2.bytes_written       {}", self.bytes_written_back());
        println!("==========================================================");
    }
}
