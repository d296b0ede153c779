use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use tokio::sync::watch;

use super::*;
use crate::test_utils::manual_clock;
use crate::{ChannelId, ScriptedProducer, TierBuilder, TierConfig};

fn controller() -> Arc<crate::HierarchyController> {
    let clock = manual_clock(1);
    let producer = ScriptedProducer::new()
        .with_constant(ChannelId(0x10), 24.0)
        .with_constant(ChannelId(0x11), 120.0)
        .with_constant(ChannelId(0x12), 35.0);
    Arc::new(TierBuilder::new(TierConfig::default()).clock(clock).producer(producer).build().unwrap())
}

#[tokio::test(start_paused = true)]
async fn test_sweep_covers_every_ttl_and_channel() {
    let controller = controller();
    let (_tx, rx) = watch::channel(());

    let results = TtlSweep::new(
        controller.clone(),
        vec![500, 1000],
        Duration::from_millis(1_000),
        Duration::from_millis(100),
        rx,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(results.len(), 6);
    assert_eq!(results.iter().map(|r| r.ttl_ms).collect::<Vec<_>>(), vec![500, 500, 500, 1000, 1000, 1000]);
    assert_eq!(results[0].channel_name, "TEMP");

    // First segment starts cold: one producer call, then cache hits
    let first = &results[0];
    assert!(first.total >= 1);
    assert_eq!(first.store_hits, 0);
    assert_eq!(first.cache_hits, first.total - 1);
    for r in &results {
        assert!(r.cache_hits + r.store_hits <= r.total);
        assert!((0.0..=100.0).contains(&r.total_hit_rate));
    }
    assert_eq!(controller.cache().ttl_ms(), 1000);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_returns_completed_segments_on_shutdown() {
    let (tx, rx) = watch::channel(());
    let sweep = TtlSweep::new(
        controller(),
        vec![500],
        Duration::from_millis(1_000),
        Duration::from_millis(100),
        rx,
    );
    let handle = tokio::spawn(sweep.run());

    tokio::time::sleep(Duration::from_millis(1_450)).await;
    tx.send(()).unwrap();

    let results = handle.await.unwrap().unwrap();
    assert!(results.len() < 3, "sweep should stop early");
}

#[test]
fn test_csv_rows() {
    let result = SweepResult {
        ttl_ms: 1500,
        total_hit_rate: 87.5,
        cache_hit_rate: 75.0,
        store_hit_rate: 12.5,
        cache_hits: 6,
        store_hits: 1,
        total: 8,
        channel: ChannelId(0x11),
        channel_name: "MQII".to_string(),
    };

    let csv = render_csv(&[result]);
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(lines.next(), Some("1500,87.50,75.00,12.50,6,1,8,MQII,0x11"));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn test_write_csv_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out/ttl.csv");

    write_csv(&[], &path).await.unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, format!("{CSV_HEADER}\n"));
}
