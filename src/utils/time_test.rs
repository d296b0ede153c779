use std::thread::sleep;
use std::time::Duration;

use crate::time::elapsed;
use crate::time::is_stale;
use crate::time::Clock;
use crate::time::ManualClock;
use crate::time::MonotonicClock;
use crate::time::Timestamp;

#[test]
fn test_elapsed_forward() {
    let t0 = Timestamp::from_millis(1_000);
    let t1 = Timestamp::from_millis(1_650);
    assert_eq!(elapsed(t0, t1), 650);
}

#[test]
fn test_elapsed_is_negative_when_t1_precedes_t0() {
    let t0 = Timestamp::from_millis(2_000);
    let t1 = Timestamp::from_millis(1_500);
    assert_eq!(elapsed(t0, t1), -500);
    assert!(!is_stale(t0, t1, 100));
}

#[test]
fn test_elapsed_across_wraparound() {
    let t0 = Timestamp::from_millis(u32::MAX - 99);
    let t1 = t0.wrapping_add(300);
    assert_eq!(t1.as_millis(), 200);
    assert_eq!(elapsed(t0, t1), 300);
    assert!(is_stale(t0, t1, 299));
    assert!(!is_stale(t0, t1, 300));
}

#[test]
fn test_manual_clock_advance_and_set() {
    let clock = ManualClock::new(Timestamp::from_millis(10));
    clock.advance(15);
    assert_eq!(clock.now(), Timestamp::from_millis(25));
    clock.set(Timestamp::from_millis(7));
    assert_eq!(clock.now().as_millis(), 7);
}

#[test]
fn test_monotonic_clock_moves_forward() {
    let clock = MonotonicClock::new();
    let t1 = clock.now();
    sleep(Duration::from_millis(10));
    let t2 = clock.now();

    // Difference should be at least 10ms
    assert!(elapsed(t1, t2) >= 10);
}

#[test]
fn test_timestamp_display() {
    assert_eq!(Timestamp::from_millis(12_034).to_string(), "12.034s");
}
