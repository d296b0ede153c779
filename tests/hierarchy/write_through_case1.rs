//! A producer answer is visible in both cheaper tiers right away, and the
//! background refresh overwrites them without moving hit counters.

use tiercache::{ScriptedProducer, Source};

use crate::commons::{harness, MQ7};

#[test]
fn test_write_through_case1() {
    let producer = ScriptedProducer::new().with_readings(MQ7, [Some(7.5), Some(8.25), Some(9.0)]);
    let h = harness(producer);
    let c = &h.controller;

    let reading = c.request(MQ7).unwrap();
    assert_eq!(reading.source, Source::Producer);
    assert_eq!(c.store().read(MQ7).unwrap(), Some(7.5));
    assert_eq!(c.cache().get(MQ7).map(|e| e.value), Some(7.5));

    c.refresh(MQ7).unwrap();
    let reading = c.request(MQ7).unwrap();
    assert_eq!((reading.value, reading.source), (8.25, Source::Cache));
    assert_eq!(c.store().write_pointer(MQ7).unwrap(), 2);

    // TTL 500ms: stale shadow, next write restarts the ring
    c.set_ttl(500);
    h.clock.advance(600);
    c.refresh(MQ7).unwrap();
    assert_eq!(c.store().write_pointer(MQ7).unwrap(), 1);
    assert_eq!(c.store().read(MQ7).unwrap(), Some(9.0));

    let m = c.metrics();
    assert_eq!((m.total, m.cache_hits, m.store_hits), (2, 1, 0));
}
