//! Channel identity and the immutable registry built at configuration time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ChannelConfig, HierarchyError, Result};

/// Stable small-integer identity of one data channel (e.g. one sensor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub u8);

impl fmt::Display for ChannelId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    /// First page of the channel's slot run in the durable medium
    pub base_page: u32,
    /// Fixed slot count in the durable store
    pub slots: usize,
}

impl From<&ChannelConfig> for Channel {
    fn from(c: &ChannelConfig) -> Self {
        Channel {
            id: ChannelId(c.id),
            name: c.name.clone(),
            base_page: c.base_page,
            slots: c.slots,
        }
    }
}

/// Ordered, immutable set of configured channels.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    channels: Vec<Channel>,
}

impl ChannelRegistry {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self { channels }
    }

    pub fn from_config(configs: &[ChannelConfig]) -> Self {
        Self::new(configs.iter().map(Channel::from).collect())
    }

    pub fn get(
        &self,
        id: ChannelId,
    ) -> Result<&Channel> {
        self.channels
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| HierarchyError::UnknownChannel(id).into())
    }

    pub fn name(
        &self,
        id: ChannelId,
    ) -> &str {
        self.channels.iter().find(|c| c.id == id).map(|c| c.name.as_str()).unwrap_or("?")
    }

    pub fn ids(&self) -> Vec<ChannelId> {
        self.channels.iter().map(|c| c.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
