use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use super::Producer;
use crate::ChannelId;

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<Option<f64>>,
    fallback: Option<f64>,
    calls: usize,
}

/// Deterministic producer for tests and scripted runs.
///
/// Each channel replays its queued readings in order; once the queue is
/// drained it keeps returning its fallback (unavailable unless set).
#[derive(Debug, Default)]
pub struct ScriptedProducer {
    scripts: Mutex<HashMap<ChannelId, Script>>,
}

impl ScriptedProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always returns `value` for `channel` once its queue is empty.
    pub fn with_constant(
        self,
        channel: ChannelId,
        value: f64,
    ) -> Self {
        self.set_fallback(channel, Some(value));
        self
    }

    pub fn with_readings(
        self,
        channel: ChannelId,
        readings: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        for reading in readings {
            self.push(channel, reading);
        }
        self
    }

    pub fn push(
        &self,
        channel: ChannelId,
        reading: Option<f64>,
    ) {
        self.scripts.lock().entry(channel).or_default().queued.push_back(reading);
    }

    pub fn set_fallback(
        &self,
        channel: ChannelId,
        fallback: Option<f64>,
    ) {
        self.scripts.lock().entry(channel).or_default().fallback = fallback;
    }

    /// How many times `channel` has been read.
    pub fn calls(
        &self,
        channel: ChannelId,
    ) -> usize {
        self.scripts.lock().get(&channel).map_or(0, |s| s.calls)
    }
}

impl Producer for ScriptedProducer {
    fn read(
        &self,
        channel: ChannelId,
    ) -> Option<f64> {
        let mut scripts = self.scripts.lock();
        let script = scripts.entry(channel).or_default();
        script.calls += 1;
        script.queued.pop_front().unwrap_or(script.fallback)
    }
}
