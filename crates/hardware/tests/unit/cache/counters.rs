//! # Counter Tests

use cachesim_core::cache::{RecencyClock, WritebackCounter};
use pretty_assertions::assert_eq;

/// Both counters can be driven at compile time.
const THIRD_TICK: u64 = {
    let mut clock = RecencyClock::new();
    let _ = clock.tick();
    let _ = clock.tick();
    clock.tick()
};

const TWO_FLUSHES: u64 = {
    let mut counter = WritebackCounter::new();
    counter.record();
    counter.record();
    counter.count()
};

#[test]
fn clock_ticks_strictly_upward_from_zero() {
    let mut clock = RecencyClock::default();
    assert_eq!(clock.now(), 0);
    assert_eq!(clock.tick(), 1);
    assert_eq!(clock.tick(), 2);
    assert_eq!(clock.now(), 2);
    assert_eq!(THIRD_TICK, 3);
}

#[test]
fn clock_reset_rewinds() {
    let mut clock = RecencyClock::new();
    for _ in 0..10 {
        let _ = clock.tick();
    }
    clock.reset();
    assert_eq!(clock.now(), 0);
    assert_eq!(clock.tick(), 1);
}

#[test]
fn writeback_counter_records_and_resets() {
    let mut counter = WritebackCounter::default();
    counter.record();
    counter.record();
    counter.record();
    assert_eq!(counter.count(), 3);
    assert_eq!(TWO_FLUSHES, 2);

    counter.reset();
    assert_eq!(counter.count(), 0);
}
