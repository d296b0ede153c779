//! Foreground requests and background refreshes hammer the same controller
//! from separate threads while a third thread moves the clock.
//!
//! - the cache never holds more than its capacity
//! - every value returned is one the producer actually produced
//! - every request is counted exactly once

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tiercache::{ChannelId, ScriptedProducer, TierConfig};

use crate::commons::{harness_with, MQ2, MQ7, TEMP};

const ROUNDS: usize = 2_000;

#[test]
fn test_two_flows_case1() {
    let producer = ScriptedProducer::new()
        .with_constant(TEMP, 25.0)
        .with_constant(MQ2, 150.5)
        .with_constant(MQ7, 30.75);
    // One entry for three channels: nearly every put evicts
    let mut config = TierConfig::default();
    config.cache.capacity = 1;
    let h = harness_with(config, producer);
    let allowed = |channel: ChannelId| match channel {
        TEMP => 25.0,
        MQ2 => 150.5,
        _ => 30.75,
    };
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                h.controller.refresh_all();
                assert!(h.controller.cache().len() <= h.controller.cache().capacity());
            }
        });
        s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                h.clock.advance(7);
                thread::yield_now();
            }
        });

        for i in 0..ROUNDS {
            let channel = [TEMP, MQ2, MQ7][i % 3];
            let reading = h.controller.request(channel).expect("producer always answers");
            assert_eq!(reading.value, allowed(channel));
            assert!(h.controller.cache().len() <= h.controller.cache().capacity());
        }
        done.store(true, Ordering::Release);
    });

    let m = h.controller.metrics();
    assert_eq!(m.total, ROUNDS as u64);
    assert!(m.cache_hits + m.store_hits <= m.total);
}
