use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::{ChannelId, ChannelRegistry, Error, HierarchyError, Result};

/// Currently selected channel of the foreground flow.
///
/// `select_next` is what a button press does: it moves to the next channel
/// in registry order and wraps around.
#[derive(Debug)]
pub struct ChannelSelector {
    channels: Vec<ChannelId>,
    index: AtomicUsize,
}

impl ChannelSelector {
    pub fn new(channels: &ChannelRegistry) -> Result<Self> {
        if channels.is_empty() {
            return Err(Error::InvalidConfig("no channel to select".into()));
        }
        Ok(Self {
            channels: channels.ids(),
            index: AtomicUsize::new(0),
        })
    }

    pub fn current(&self) -> ChannelId {
        self.channels[self.index.load(Ordering::Acquire) % self.channels.len()]
    }

    pub fn select_next(&self) -> ChannelId {
        let len = self.channels.len();
        let prev = self
            .index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or_default();
        let next = self.channels[(prev + 1) % len];
        debug!("selected channel {next}");
        next
    }

    pub fn select(
        &self,
        channel: ChannelId,
    ) -> Result<()> {
        let position = self
            .channels
            .iter()
            .position(|c| *c == channel)
            .ok_or(HierarchyError::UnknownChannel(channel))?;
        self.index.store(position, Ordering::Release);
        Ok(())
    }
}
