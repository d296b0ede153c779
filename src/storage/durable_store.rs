//! Durable slotted tier.
//!
//! Each channel owns a contiguous run of fixed-size slots in the medium. Writes
//! go round a FIFO ring; when the channel's last committed write (its shadow
//! record) has gone stale, the ring restarts at slot 0. Reads always look at
//! the slot behind the write pointer.
//!
//! All state, the medium included, sits behind one mutex. Physical reads that
//! fail are reported as absent; physical writes are fire-and-forget and the
//! shadow record tracks the last *attempted* write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::medium::{check_range, Medium};
use super::slot::{encode_slot, SlotState};
use crate::constants::SLOT_SIZE;
use crate::metrics::{MEDIUM_IO_ERRORS, STORE_RECYCLES};
use crate::time::{is_stale, Clock, Timestamp};
use crate::{ChannelId, ChannelRegistry, Error, HierarchyError, Result, StorageError};

/// Most recent committed write of a channel, independent of the slot holding it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShadowRecord {
    pub timestamp: Timestamp,
    pub value: f64,
}

/// A stored value and the time of the channel's last write, if known.
///
/// `written_at` is `None` when no write happened since startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampedValue {
    pub value: f64,
    pub written_at: Option<Timestamp>,
}

/// Where a write landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWrite {
    pub slot: usize,
    /// The shadow was stale and the ring restarted at slot 0
    pub recycled: bool,
    /// Every byte reached the medium without an I/O error
    pub committed: bool,
}

#[derive(Debug)]
struct ChannelRun {
    base_address: u32,
    slot_count: usize,
    write_pointer: usize,
    shadow: Option<ShadowRecord>,
}

impl ChannelRun {
    fn slot_address(
        &self,
        slot: usize,
    ) -> u32 {
        self.base_address + (slot * SLOT_SIZE) as u32
    }

    fn last_written_slot(&self) -> usize {
        (self.write_pointer + self.slot_count - 1) % self.slot_count
    }
}

struct StoreInner {
    medium: Box<dyn Medium>,
    runs: HashMap<ChannelId, ChannelRun>,
}

impl StoreInner {
    fn run(
        &self,
        channel: ChannelId,
    ) -> Result<&ChannelRun> {
        self.runs.get(&channel).ok_or_else(|| HierarchyError::UnknownChannel(channel).into())
    }

    fn run_mut(
        &mut self,
        channel: ChannelId,
    ) -> Result<&mut ChannelRun> {
        self.runs
            .get_mut(&channel)
            .ok_or_else(|| HierarchyError::UnknownChannel(channel).into())
    }
}

pub struct DurableStore {
    inner: Mutex<StoreInner>,
    ttl_ms: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for DurableStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("DurableStore").field("ttl_ms", &self.ttl_ms()).finish()
    }
}

impl DurableStore {
    /// Lays every channel's slot run out on `medium`.
    ///
    /// # Errors
    /// `StorageError::AddressOutOfRange` when a run does not fit the medium.
    pub fn new(
        medium: Box<dyn Medium>,
        channels: &ChannelRegistry,
        page_size: u32,
        ttl_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let capacity = medium.capacity();
        let mut runs = HashMap::with_capacity(channels.len());
        for channel in channels.iter() {
            if channel.slots == 0 {
                return Err(Error::InvalidConfig(format!("channel {} has no slots", channel.name)));
            }
            let len = channel.slots * SLOT_SIZE;
            let base_address = channel.base_page.checked_mul(page_size).ok_or(
                StorageError::AddressOutOfRange {
                    address: u32::MAX,
                    len,
                    capacity,
                },
            )?;
            check_range(base_address, len, capacity)?;
            runs.insert(
                channel.id,
                ChannelRun {
                    base_address,
                    slot_count: channel.slots,
                    write_pointer: 0,
                    shadow: None,
                },
            );
        }

        Ok(Self {
            inner: Mutex::new(StoreInner { medium, runs }),
            ttl_ms: AtomicU64::new(ttl_ms),
            clock,
        })
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

    /// Commits `value` for `channel`.
    ///
    /// Stale shadow: the value goes to slot 0 and the pointer becomes 1.
    /// Otherwise it goes to the slot under the pointer, which then advances
    /// modulo the slot count. The shadow record is overwritten either way.
    pub fn write(
        &self,
        channel: ChannelId,
        value: f64,
    ) -> Result<SlotWrite> {
        let ttl_ms = self.ttl_ms();
        let mut inner = self.inner.lock();
        let now = self.clock.now();

        let run = inner.run_mut(channel)?;
        let recycled = run.shadow.is_some_and(|s| is_stale(s.timestamp, now, ttl_ms));
        let slot = if recycled { 0 } else { run.write_pointer };
        run.write_pointer = (slot + 1) % run.slot_count;
        run.shadow = Some(ShadowRecord { timestamp: now, value });
        let address = run.slot_address(slot);

        if recycled {
            STORE_RECYCLES.inc();
            debug!("channel {channel}: shadow stale, recycling to slot 0");
        }

        let mut committed = true;
        for (offset, byte) in encode_slot(value).into_iter().enumerate() {
            if let Err(e) = inner.medium.write(address + offset as u32, byte) {
                MEDIUM_IO_ERRORS.with_label_values(&["write"]).inc();
                warn!("channel {channel}: write to {:#06x} failed, left unverified: {:?}", address, e);
                committed = false;
                break;
            }
        }

        trace!("channel {channel}: wrote {value} to slot {slot} @ {:#06x}", address);
        Ok(SlotWrite {
            slot,
            recycled,
            committed,
        })
    }

    /// Reads the slot behind the write pointer.
    ///
    /// Sentinel patterns and medium failures read as `None`. A decoded NaN is
    /// returned as-is; deciding what NaN means is up to the caller.
    pub fn read(
        &self,
        channel: ChannelId,
    ) -> Result<Option<f64>> {
        let inner = self.inner.lock();
        Self::read_locked(&inner, channel)
    }

    /// Like [`read`](Self::read), paired with the shadow timestamp taken under
    /// the same lock, so a concurrent write can never mix the two.
    pub fn read_stamped(
        &self,
        channel: ChannelId,
    ) -> Result<Option<StampedValue>> {
        let inner = self.inner.lock();
        let value = Self::read_locked(&inner, channel)?;
        let written_at = inner.run(channel)?.shadow.map(|s| s.timestamp);
        Ok(value.map(|value| StampedValue { value, written_at }))
    }

    fn read_locked(
        inner: &StoreInner,
        channel: ChannelId,
    ) -> Result<Option<f64>> {
        let run = inner.run(channel)?;
        let slot = run.last_written_slot();
        let address = run.slot_address(slot);

        match inner.medium.read(address, SLOT_SIZE) {
            Ok(raw) => {
                let value = SlotState::decode(&raw).and_then(SlotState::value);
                trace!("channel {channel}: slot {slot} read {:?}", value);
                Ok(value)
            }
            Err(e) => {
                MEDIUM_IO_ERRORS.with_label_values(&["read"]).inc();
                warn!("channel {channel}: read of {:#06x} failed, treating as miss: {:?}", address, e);
                Ok(None)
            }
        }
    }

    /// Decodes one physical slot of `channel` without touching the pointer.
    #[cfg(test)]
    pub(crate) fn inspect_slot(
        &self,
        channel: ChannelId,
        slot: usize,
    ) -> Result<Option<SlotState>> {
        let inner = self.inner.lock();
        let run = inner.run(channel)?;
        if slot >= run.slot_count {
            return Ok(None);
        }
        let raw = inner.medium.read(run.slot_address(slot), SLOT_SIZE)?;
        Ok(SlotState::decode(&raw))
    }

    pub fn shadow(
        &self,
        channel: ChannelId,
    ) -> Result<Option<ShadowRecord>> {
        Ok(self.inner.lock().run(channel)?.shadow)
    }

    /// First byte of the slot run of `channel`.
    pub fn base_address(
        &self,
        channel: ChannelId,
    ) -> Result<u32> {
        Ok(self.inner.lock().run(channel)?.base_address)
    }

    pub fn write_pointer(
        &self,
        channel: ChannelId,
    ) -> Result<usize> {
        Ok(self.inner.lock().run(channel)?.write_pointer)
    }

    /// Write pointers of every channel, ordered by channel id.
    pub fn write_pointers(&self) -> Vec<(ChannelId, usize)> {
        let inner = self.inner.lock();
        let mut pointers: Vec<_> = inner.runs.iter().map(|(id, run)| (*id, run.write_pointer)).collect();
        pointers.sort_by_key(|(id, _)| *id);
        pointers
    }
}
