//! # Simulator Tests
//!
//! Replays short traces through the reference hierarchy and checks the statistics that
//! come out of the driver loop.

use std::io::Cursor;

use cachesim_core::config::HierarchyConfig;
use cachesim_core::sim::{Simulator, TraceError, TraceRecord, run_trace};
use pretty_assertions::assert_eq;

use crate::common::harness::{reference_config, reference_hierarchy};

/// Cold write, hit, L1 conflict, L2 hit, then two more L2-set-0 blocks to force a
/// dirty L2 eviction.
fn mixed_trace() -> Vec<TraceRecord> {
    vec![
        TraceRecord::write(0x000), // 111
        TraceRecord::read(0x004),  // 1
        TraceRecord::read(0x100),  // 111
        TraceRecord::read(0x000),  // 11
        TraceRecord::read(0x200),  // 111
        TraceRecord::read(0x400),  // 111, evicts dirty 0x000 from L2
    ]
}

#[test]
fn simulator_counts_every_access() {
    let mut sim = Simulator::new(reference_hierarchy(true));
    sim.run(mixed_trace());
    let stats = sim.finish();

    assert_eq!(stats.accesses, 6);
    assert_eq!(stats.reads, 5);
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.l1_hits, 1);
    assert_eq!(stats.l1_misses, 5);
    assert_eq!(stats.l2_hits, 1);
    assert_eq!(stats.l2_misses, 4);
    assert_eq!(stats.total_cycles, 111 + 1 + 111 + 11 + 111 + 111);
    assert_eq!(stats.writebacks, 1);
    assert_eq!(stats.block_bytes, 16);
    assert_eq!(stats.bytes_written_back(), 16);
}

#[test]
fn step_matches_run() {
    let mut stepped = Simulator::new(reference_hierarchy(true));
    for record in mixed_trace() {
        stepped.step(record);
    }
    let mut batched = Simulator::new(reference_hierarchy(true));
    batched.run(mixed_trace());

    let (a, b) = (stepped.finish(), batched.finish());
    assert_eq!(a.total_cycles, b.total_cycles);
    assert_eq!(a.l1_misses, b.l1_misses);
    assert_eq!(a.writebacks, b.writebacks);
}

#[test]
fn from_config_rejects_bad_geometry() {
    let mut config = HierarchyConfig::default();
    config.l2.block_log2 = 3;
    assert!(Simulator::from_config(&config).is_err());
}

#[test]
fn run_reader_streams_text() {
    let mut sim = Simulator::from_config(&reference_config(true)).unwrap();
    sim.run_reader(Cursor::new("w 0\nr 4\n# done\n")).unwrap();
    let stats = sim.finish();
    assert_eq!(stats.accesses, 2);
    assert_eq!(stats.total_cycles, 112);
}

#[test]
fn run_reader_keeps_accesses_before_a_bad_line() {
    let mut sim = Simulator::new(reference_hierarchy(true));
    let err = sim
        .run_reader(Cursor::new("r 0\nr 10\nz 20\nr 30\n"))
        .unwrap_err();

    assert!(matches!(err, TraceError::Parse { line: 3, .. }));
    assert_eq!(sim.stats.accesses, 2);
}

#[test]
fn run_trace_counts_writebacks_of_this_run_only() {
    let mut h = reference_hierarchy(true);

    let first = run_trace(&mut h, mixed_trace());
    assert_eq!(first.writebacks, 1);
    assert_eq!(first.accesses, 6);

    // L2 set 0 now holds clean 0x200 and 0x400. Dirty both, then push both out.
    let second = run_trace(
        &mut h,
        vec![
            TraceRecord::write(0x200),
            TraceRecord::write(0x400),
            TraceRecord::read(0x600),
            TraceRecord::read(0x800),
        ],
    );
    assert_eq!(second.accesses, 4);
    assert_eq!(second.writebacks, 2);
    assert_eq!(h.writebacks(), 3);
}

#[test]
fn empty_run_reports_zeroes() {
    let stats = run_trace(&mut reference_hierarchy(false), Vec::new());
    assert_eq!(stats.accesses, 0);
    assert_eq!(stats.average_access_time(), 0.0);
    assert_eq!(stats.summary(), "L1miss=0.000 L2miss=0.000 AccTimeAvg=0.000");
}
