//! Read path and refresh path over the three tiers.
//!
//! `request` walks Cache -> DurableStore -> Producer and writes through on
//! the way back. `refresh` goes straight to the producer and writes through
//! unconditionally. The cache and store locks are each taken and released
//! inside a single tier call, so no code path ever holds both.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, trace};

use super::LayoutSnapshot;
use crate::metrics::{MetricsRegistry, MetricsSnapshot, REFRESHES, REQUESTS, REQUEST_LATENCY};
use crate::time::{Clock, Timestamp};
use crate::{Cache, ChannelId, ChannelRegistry, DurableStore, HierarchyError, Producer, Result, StampedValue};

/// Tier that satisfied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Source {
    Cache,
    Store,
    Producer,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Store => "store",
            Source::Producer => "producer",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to a foreground request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub channel: ChannelId,
    pub value: f64,
    pub source: Source,
    /// When the returned value was last touched by the tier that served it
    pub timestamp: Timestamp,
}

pub struct HierarchyController {
    channels: ChannelRegistry,
    cache: Cache,
    store: DurableStore,
    producer: Box<dyn Producer>,
    metrics: MetricsRegistry,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for HierarchyController {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("HierarchyController")
            .field("channels", &self.channels)
            .field("cache", &self.cache)
            .field("store", &self.store)
            .finish()
    }
}

impl HierarchyController {
    pub fn new(
        channels: ChannelRegistry,
        cache: Cache,
        store: DurableStore,
        producer: Box<dyn Producer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            channels,
            cache,
            store,
            producer,
            metrics: MetricsRegistry::new(),
            clock,
        }
    }

    pub fn channels(&self) -> &ChannelRegistry {
        &self.channels
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn store(&self) -> &DurableStore {
        &self.store
    }

    /// Serves `channel` from the cheapest tier holding a fresh value.
    ///
    /// # Errors
    /// - `HierarchyError::UnknownChannel` before any tier or counter is touched
    /// - `HierarchyError::Unavailable` when every tier missed and the producer
    ///   had nothing; nothing is written in that case
    pub fn request(
        &self,
        channel: ChannelId,
    ) -> Result<Reading> {
        self.channels.get(channel)?;
        let started = Instant::now();

        self.cache.expire_if_stale(channel);
        if let Some(entry) = self.cache.get(channel) {
            self.metrics.record_cache_hit();
            return Ok(self.served(channel, entry.value, Source::Cache, entry.last_access, started));
        }

        match self.store.read_stamped(channel)? {
            Some(StampedValue { value, written_at }) if !value.is_nan() => {
                // Store lock is released before the cache is touched
                let timestamp = written_at.unwrap_or_else(|| self.clock.now());
                self.cache.put(channel, value);
                self.metrics.record_store_hit();
                return Ok(self.served(channel, value, Source::Store, timestamp, started));
            }
            Some(_) => trace!("store {channel}: NaN treated as miss"),
            None => trace!("store {channel}: miss"),
        }

        self.metrics.record_miss();
        let (value, timestamp) = self
            .produce_and_write_through(channel)
            .inspect_err(|_| REQUESTS.with_label_values(&["unavailable"]).inc())?;
        Ok(self.served(channel, value, Source::Producer, timestamp, started))
    }

    /// Pulls a fresh value from the producer into the store and the cache.
    ///
    /// Never consults the cache or store first and never moves hit counters.
    pub fn refresh(
        &self,
        channel: ChannelId,
    ) -> Result<()> {
        self.channels.get(channel)?;
        match self.produce_and_write_through(channel) {
            Ok((value, _)) => {
                REFRESHES.with_label_values(&["ok"]).inc();
                trace!("refreshed {channel} = {value}");
                Ok(())
            }
            Err(e) => {
                REFRESHES.with_label_values(&["unavailable"]).inc();
                Err(e)
            }
        }
    }

    /// Refreshes every configured channel in registry order.
    ///
    /// Returns the channels whose producer was unavailable.
    pub fn refresh_all(&self) -> Vec<ChannelId> {
        self.channels
            .ids()
            .into_iter()
            .filter(|id| match self.refresh(*id) {
                Ok(()) => false,
                Err(e) => {
                    debug!("refresh {id} skipped: {}", e);
                    true
                }
            })
            .collect()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    /// Applies one TTL to both the cache and the store.
    pub fn set_ttl(
        &self,
        ttl_ms: u64,
    ) {
        self.cache.set_ttl_ms(ttl_ms);
        self.store.set_ttl_ms(ttl_ms);
        debug!("ttl set to {}ms", ttl_ms);
    }

    pub fn layout(&self) -> LayoutSnapshot {
        LayoutSnapshot::capture(self)
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn produce_and_write_through(
        &self,
        channel: ChannelId,
    ) -> Result<(f64, Timestamp)> {
        let value = self
            .producer
            .read(channel)
            .ok_or(HierarchyError::Unavailable { channel })?;
        let timestamp = self.clock.now();

        let write = self.store.write(channel, value)?;
        let evicted = self.cache.put(channel, value);
        debug!(
            "write-through {channel} = {value}: slot {} recycled={} committed={} evicted={:?}",
            write.slot, write.recycled, write.committed, evicted
        );
        Ok((value, timestamp))
    }

    fn served(
        &self,
        channel: ChannelId,
        value: f64,
        source: Source,
        timestamp: Timestamp,
        started: Instant,
    ) -> Reading {
        REQUESTS.with_label_values(&[source.as_str()]).inc();
        REQUEST_LATENCY
            .with_label_values(&[source.as_str()])
            .observe(started.elapsed().as_secs_f64() * 1000.0);
        trace!("request {channel} served by {source}");
        Reading {
            channel,
            value,
            source,
            timestamp,
        }
    }
}
