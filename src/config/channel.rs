use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use super::StoreConfig;
use crate::constants::SLOT_SIZE;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub id: u8,
    pub name: String,
    pub base_page: u32,
    #[serde(default = "default_slots")]
    pub slots: usize,
}

impl ChannelConfig {
    pub fn new(
        id: u8,
        name: &str,
        base_page: u32,
        slots: usize,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            base_page,
            slots,
        }
    }

    /// Byte range `[start, end)` of the channel's slot run
    fn byte_range(
        &self,
        page_size: u32,
    ) -> (u64, u64) {
        let start = self.base_page as u64 * page_size as u64;
        (start, start + (self.slots * SLOT_SIZE) as u64)
    }
}

/// Temperature, MQ-2 and MQ-7 gas channels at their reference page offsets.
pub fn default_channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig::new(0x10, "TEMP", 84, default_slots()),
        ChannelConfig::new(0x11, "MQII", 0, default_slots()),
        ChannelConfig::new(0x12, "MQIV", 42, default_slots()),
    ]
}

fn default_slots() -> usize {
    4
}

/// Checks ids, names and that slot runs fit the medium without overlapping.
pub(super) fn validate_channels(
    channels: &[ChannelConfig],
    store: &StoreConfig,
) -> Result<()> {
    if channels.is_empty() {
        return Err(Error::InvalidConfig("at least one channel is required".into()));
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    let capacity = store.capacity() as u64;
    let mut ranges = Vec::with_capacity(channels.len());

    for c in channels {
        if !ids.insert(c.id) {
            return Err(Error::InvalidConfig(format!("duplicate channel id {:#04x}", c.id)));
        }
        if c.name.trim().is_empty() {
            return Err(Error::InvalidConfig(format!("channel {:#04x} has an empty name", c.id)));
        }
        if !names.insert(c.name.as_str()) {
            return Err(Error::InvalidConfig(format!("duplicate channel name {}", c.name)));
        }
        if c.slots == 0 {
            return Err(Error::InvalidConfig(format!("channel {} needs at least 1 slot", c.name)));
        }

        let (start, end) = c.byte_range(store.page_size);
        if end > capacity {
            return Err(Error::InvalidConfig(format!(
                "channel {} slots [{start}, {end}) exceed medium capacity {capacity}",
                c.name
            )));
        }
        ranges.push((start, end, c.name.as_str()));
    }

    ranges.sort_by_key(|(start, _, _)| *start);
    for pair in ranges.windows(2) {
        let (_, prev_end, prev_name) = pair[0];
        let (next_start, _, next_name) = pair[1];
        if next_start < prev_end {
            return Err(Error::InvalidConfig(format!(
                "channels {prev_name} and {next_name} overlap in the medium"
            )));
        }
    }

    Ok(())
}
