//! Capacity 2, TTL 600ms, channels {TEMP, MQ2, MQ7}.
//!
//! 1. TEMP and MQ2 are served by the producer
//! 2. TEMP again within the TTL is a cache hit
//! 3. MQ7 evicts MQ2, the entry with the older last access
//! 4. MQ2 misses the cache and is served by the store
//! 5. After the TTL every cached entry is gone, the store still answers

use tiercache::{ScriptedProducer, Source};

use crate::commons::{harness, MQ2, MQ7, TEMP};
use crate::enable_logger;

#[test]
fn test_eviction_and_expiry_case1() {
    enable_logger();
    let producer = ScriptedProducer::new()
        .with_constant(TEMP, 24.5)
        .with_constant(MQ2, 180.0)
        .with_constant(MQ7, 12.25);
    let h = harness(producer);
    let c = &h.controller;

    assert_eq!(c.request(TEMP).unwrap().source, Source::Producer);
    h.clock.advance(100);
    assert_eq!(c.request(MQ2).unwrap().source, Source::Producer);
    h.clock.advance(100);

    let temp = c.request(TEMP).unwrap();
    assert_eq!((temp.value, temp.source), (24.5, Source::Cache));
    h.clock.advance(100);

    assert_eq!(c.request(MQ7).unwrap().source, Source::Producer);
    assert!(c.cache().entries().iter().all(|e| e.channel != MQ2));

    let mq2 = c.request(MQ2).unwrap();
    assert_eq!((mq2.value, mq2.source), (180.0, Source::Store));

    h.clock.advance(601);
    assert_eq!(c.request(TEMP).unwrap().source, Source::Store);

    let m = c.metrics();
    assert_eq!((m.total, m.cache_hits, m.store_hits), (6, 1, 2));
    assert!((m.overall_hit_rate - 0.5).abs() < 1e-9);
}
