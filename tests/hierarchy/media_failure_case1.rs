//! Medium failures never reach the caller.
//!
//! - write failures: the request still succeeds and the cache still fills
//! - read failures: the store counts as a miss and the producer is asked

use tiercache::{ScriptedProducer, Source};

use crate::commons::{harness, TEMP};

#[test]
fn test_media_failure_case1() {
    let producer = ScriptedProducer::new().with_readings(TEMP, [Some(20.0), Some(21.0), Some(22.0)]);
    let h = harness(producer);
    let c = &h.controller;

    h.faults.fail_writes(true);
    let reading = c.request(TEMP).unwrap();
    assert_eq!((reading.value, reading.source), (20.0, Source::Producer));
    assert_eq!(c.store().shadow(TEMP).unwrap().map(|s| s.value), Some(20.0));
    h.faults.fail_writes(false);

    // Cache expires; nothing reached the medium, so the producer answers
    h.clock.advance(601);
    let reading = c.request(TEMP).unwrap();
    assert_eq!((reading.value, reading.source), (21.0, Source::Producer));

    h.faults.fail_reads(true);
    h.clock.advance(601);
    let reading = c.request(TEMP).unwrap();
    assert_eq!((reading.value, reading.source), (22.0, Source::Producer));

    h.faults.fail_reads(false);
    h.clock.advance(601);
    assert_eq!(c.request(TEMP).unwrap().source, Source::Store);

    // Producer exhausted: unavailable, still counted
    h.faults.fail_reads(true);
    h.clock.advance(601);
    assert!(c.request(TEMP).unwrap_err().is_unavailable());
    assert_eq!(c.metrics().total, 5);
}
