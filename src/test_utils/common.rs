use std::sync::Arc;

use crate::time::{ManualClock, Timestamp};
use crate::{default_channels, ChannelRegistry};

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    env_logger::init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

/// TEMP, MQII and MQIV with their default pages.
pub fn default_registry() -> ChannelRegistry {
    ChannelRegistry::from_config(&default_channels())
}

pub fn manual_clock(start_ms: u32) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Timestamp::from_millis(start_ms)))
}
