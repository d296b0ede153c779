use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Cumulative request accounting for one controller.
///
/// Counters only move forward until [`MetricsRegistry::reset`].
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    total: AtomicU64,
    cache_hits: AtomicU64,
    store_hits: AtomicU64,
}

/// Point-in-time copy of the counters plus derived ratios in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub cache_hits: u64,
    pub store_hits: u64,
    pub cache_hit_rate: f64,
    pub store_hit_rate: f64,
    pub overall_hit_rate: f64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_hit(&self) {
        self.store_hits.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// A request that reached the producer, whether or not it produced a value.
    pub fn record_miss(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let store_hits = self.store_hits.load(Ordering::Relaxed);

        MetricsSnapshot {
            total,
            cache_hits,
            store_hits,
            cache_hit_rate: ratio(cache_hits, total),
            store_hit_rate: ratio(store_hits, total),
            overall_hit_rate: ratio(cache_hits + store_hits, total),
        }
    }

    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.store_hits.store(0, Ordering::Relaxed);
    }
}

fn ratio(
    part: u64,
    total: u64,
) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
