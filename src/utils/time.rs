use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

/// Millisecond tick of a 32-bit monotonic counter.
///
/// The counter wraps roughly every 49.7 days. Never compare two timestamps
/// directly; use [`elapsed`], which is wraparound-safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(u32);

impl Timestamp {
    pub const fn from_millis(ms: u32) -> Self {
        Timestamp(ms)
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }

    pub fn wrapping_add(
        self,
        ms: u32,
    ) -> Self {
        Timestamp(self.0.wrapping_add(ms))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let (sec, ms) = (self.0 / 1000, self.0 % 1000);
        write!(f, "{}.{:03}s", sec, ms)
    }
}

/// Signed milliseconds from `t0` to `t1`.
///
/// Negative when `t1` precedes `t0`; valid while the real distance is below
/// half the counter period.
pub fn elapsed(
    t0: Timestamp,
    t1: Timestamp,
) -> i64 {
    t1.0.wrapping_sub(t0.0) as i32 as i64
}

/// True when more than `ttl_ms` have passed between `since` and `now`.
pub(crate) fn is_stale(
    since: Timestamp,
    now: Timestamp,
    ttl_ms: u64,
) -> bool {
    elapsed(since, now) > ttl_ms as i64
}

#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Timestamp;
}

/// Process-relative monotonic clock.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        // Truncation is the wraparound.
        Timestamp(self.origin.elapsed().as_millis() as u32)
    }
}

/// Clock that only moves when told to. Used by tests and scripted runs.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU32,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU32::new(start.0),
        }
    }

    pub fn advance(
        &self,
        ms: u32,
    ) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(
        &self,
        ts: Timestamp,
    ) {
        self.now.store(ts.0, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.load(Ordering::SeqCst))
    }
}
