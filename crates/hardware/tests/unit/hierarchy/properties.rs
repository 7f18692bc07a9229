//! # Hierarchy Properties
//!
//! Random access streams over the reference hierarchy, with the structural invariants
//! checked after every single access:
//!
//! - no set holds the same tag twice, in either level;
//! - every valid L1 block is also resident in L2;
//! - the write-back counter grows by exactly one when, and only when, the access forced a
//!   dirty L2 line out;
//! - a block evicted from L2 is gone from L1 too;
//! - latency is one of the three possible totals.

use std::collections::HashSet;

use cachesim_core::cache::{CacheLevel, CacheSet};
use cachesim_core::{Address, Hierarchy};
use proptest::prelude::*;

use crate::common::harness::{L1_LATENCY, L2_LATENCY, MEM_LATENCY, reference_hierarchy};

/// Addresses over 4 KiB: four times the L2 capacity, so both levels keep evicting.
fn access_stream() -> impl Strategy<Value = Vec<(u32, bool)>> {
    prop::collection::vec((0u32..0x1000, any::<bool>()), 1..400)
}

fn assert_unique_tags<L: CacheLevel>(level: &L) {
    for (index, set) in level.array().sets().iter().enumerate() {
        let mut seen = HashSet::new();
        for line in set.lines().iter().filter(|line| line.valid) {
            assert!(
                seen.insert(line.tag),
                "{} set {index} holds tag {:#x} twice",
                level.name(),
                line.tag
            );
        }
    }
}

fn assert_inclusion(h: &Hierarchy) {
    let decoder = h.l1().geometry().decoder();
    for (index, set) in h.l1().array().sets().iter().enumerate() {
        for line in set.lines().iter().filter(|line| line.valid) {
            let block = decoder.reconstruct(line.tag, index as u32);
            assert!(h.l2().contains(block), "L1 block {block} missing from L2");
        }
    }
}

/// What the L2 set of `address` looks like before the access, and the block it would
/// give up if the access reaches L2 and misses.
fn predicted_victim(h: &Hierarchy, address: Address) -> Option<(Address, bool)> {
    if h.l1().contains(address) || h.l2().contains(address) {
        return None;
    }
    let loc = h.l2().array().locate(address);
    let set: &CacheSet = &h.l2().array().sets()[loc.index as usize];
    let line = set.lines()[set.victim()];
    line.valid.then(|| {
        let block = h.l2().geometry().decoder().reconstruct(line.tag, loc.index);
        (block, line.dirty)
    })
}

fn replay(mut h: Hierarchy, stream: &[(u32, bool)]) {
    for &(raw, is_write) in stream {
        let address = Address::new(raw);
        let victim = predicted_victim(&h, address);
        let before = h.writebacks();

        let outcome = h.access(raw, is_write);

        assert!(
            [
                L1_LATENCY,
                L1_LATENCY + L2_LATENCY,
                L1_LATENCY + L2_LATENCY + MEM_LATENCY
            ]
            .contains(&outcome.cycles),
            "unexpected latency {}",
            outcome.cycles
        );
        assert_eq!(outcome.hit, outcome.l2_hit.is_none());

        let expected_flushes = u64::from(matches!(victim, Some((_, true))));
        assert_eq!(h.writebacks() - before, expected_flushes);
        if let Some((block, _)) = victim {
            assert!(!h.l2().contains(block));
            assert!(!h.l1().contains(block));
        }

        assert!(h.l2().contains(address));
        assert_unique_tags(h.l1());
        assert_unique_tags(h.l2());
        assert_inclusion(&h);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_with_write_allocate(stream in access_stream()) {
        replay(reference_hierarchy(true), &stream);
    }

    #[test]
    fn invariants_hold_with_write_no_allocate(stream in access_stream()) {
        replay(reference_hierarchy(false), &stream);
    }

    #[test]
    fn hit_after_access_unless_write_bypasses_l1(
        stream in access_stream(),
        write_allocate in any::<bool>(),
    ) {
        let mut h = reference_hierarchy(write_allocate);
        for (raw, is_write) in stream {
            let _ = h.access(raw, is_write);
            let cached = h.l1().contains(Address::new(raw));
            let bypassed = is_write && !write_allocate;
            // A bypassing write leaves L1 as it was, which may or may not hold the block.
            if !bypassed {
                prop_assert!(cached);
            }
        }
    }
}
