//! The sled medium keeps slot contents across a restart, but pointers and
//! shadow records start over.
//!
//! 1. A half-filled ring reads as empty after restart: the pointer is back
//!    at 0, so the slot read is K-1, which was never written
//! 2. A full ring answers from the store after restart

use tempfile::tempdir;
use tiercache::{MediumBackend, ScriptedProducer, Source, TierBuilder, TierConfig};

use crate::commons::{MQ2, TEMP};

fn sled_config(dir: &std::path::Path) -> TierConfig {
    let mut config = TierConfig::default();
    config.store.backend = MediumBackend::Sled;
    config.store.db_dir = dir.to_path_buf();
    config.validate().unwrap()
}

#[test]
fn test_sled_restart_case1() {
    let dir = tempdir().unwrap();
    let config = sled_config(dir.path());

    {
        let producer = ScriptedProducer::new().with_constant(TEMP, 19.5).with_constant(MQ2, 210.0);
        let c = TierBuilder::new(config.clone()).producer(producer).build().unwrap();
        c.refresh(TEMP).unwrap();
        c.refresh(TEMP).unwrap();
        for _ in 0..4 {
            c.refresh(MQ2).unwrap();
        }
    }

    let producer = ScriptedProducer::new().with_constant(TEMP, 20.5);
    let c = TierBuilder::new(config).producer(producer).build().unwrap();

    let temp = c.request(TEMP).unwrap();
    assert_eq!((temp.value, temp.source), (20.5, Source::Producer));

    let mq2 = c.request(MQ2).unwrap();
    assert_eq!((mq2.value, mq2.source), (210.0, Source::Store));
    assert!(c.store().shadow(MQ2).unwrap().is_none());
}
