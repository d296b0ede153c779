//! Volatile tier: a tiny map from channel to its most recent value.
//!
//! Entries expire lazily. Nothing is dropped in the background; a stale entry
//! is removed the next time its channel is looked up.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::metrics::CACHE_EVICTIONS;
use crate::time::{elapsed, is_stale, Clock, Timestamp};
use crate::ChannelId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheEntry {
    pub channel: ChannelId,
    pub value: f64,
    pub last_access: Timestamp,
}

pub struct Cache {
    entries: Mutex<HashMap<ChannelId, CacheEntry>>,
    capacity: usize,
    ttl_ms: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Cache {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("capacity", &self.capacity)
            .field("ttl_ms", &self.ttl_ms())
            .field("len", &self.len())
            .finish()
    }
}

impl Cache {
    pub fn new(
        capacity: usize,
        ttl_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: Mutex::new(HashMap::with_capacity(capacity)),
            capacity,
            ttl_ms: AtomicU64::new(ttl_ms),
            clock,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms.load(Ordering::Relaxed)
    }

    pub fn set_ttl_ms(
        &self,
        ttl_ms: u64,
    ) {
        self.ttl_ms.store(ttl_ms, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drops the entry of `channel` if it has been idle for longer than the TTL.
    ///
    /// Returns true when an entry was removed.
    pub fn expire_if_stale(
        &self,
        channel: ChannelId,
    ) -> bool {
        let now = self.clock.now();
        let ttl_ms = self.ttl_ms();
        let mut entries = self.entries.lock();
        Self::expire_locked(&mut entries, channel, now, ttl_ms)
    }

    /// Returns the cached entry and refreshes its `last_access`.
    ///
    /// A stale entry is expired first, so it is never returned.
    pub fn get(
        &self,
        channel: ChannelId,
    ) -> Option<CacheEntry> {
        let now = self.clock.now();
        let ttl_ms = self.ttl_ms();
        let mut entries = self.entries.lock();
        Self::expire_locked(&mut entries, channel, now, ttl_ms);

        let entry = entries.get_mut(&channel)?;
        entry.last_access = now;
        trace!("cache hit {channel}: {}", entry.value);
        Some(*entry)
    }

    /// Inserts or overwrites the entry of `channel`.
    ///
    /// When the cache is full and `channel` is new, the entry with the oldest
    /// `last_access` is evicted first and its channel returned. Ties between
    /// equal timestamps are broken in no particular order. A zero-capacity
    /// cache stores nothing.
    pub fn put(
        &self,
        channel: ChannelId,
        value: f64,
    ) -> Option<ChannelId> {
        if self.capacity == 0 {
            trace!("cache disabled, {channel} not stored");
            return None;
        }
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let mut evicted = None;
        if entries.len() >= self.capacity && !entries.contains_key(&channel) {
            // Oldest by wraparound-safe distance to now
            let victim = entries
                .values()
                .max_by_key(|e| elapsed(e.last_access, now))
                .map(|e| e.channel);
            if let Some(victim) = victim {
                entries.remove(&victim);
                CACHE_EVICTIONS.inc();
                debug!("cache full, evicted {victim} for {channel}");
                evicted = Some(victim);
            }
        }

        entries.insert(
            channel,
            CacheEntry {
                channel,
                value,
                last_access: now,
            },
        );
        evicted
    }

    /// All live entries ordered by channel id, without touching `last_access`.
    pub fn entries(&self) -> Vec<CacheEntry> {
        let mut entries: Vec<_> = self.entries.lock().values().copied().collect();
        entries.sort_by_key(|e| e.channel);
        entries
    }

    fn expire_locked(
        entries: &mut HashMap<ChannelId, CacheEntry>,
        channel: ChannelId,
        now: Timestamp,
        ttl_ms: u64,
    ) -> bool {
        match entries.get(&channel) {
            Some(entry) if is_stale(entry.last_access, now, ttl_ms) => {
                entries.remove(&channel);
                debug!("cache entry {channel} expired");
                true
            }
            _ => false,
        }
    }
}
