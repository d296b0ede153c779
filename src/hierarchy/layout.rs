use std::fmt;

use serde::Serialize;

use super::HierarchyController;
use crate::storage::ShadowRecord;
use crate::time::Timestamp;
use crate::{CacheEntry, ChannelId};

/// Durable-tier state of one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelLayout {
    pub channel: ChannelId,
    pub name: String,
    pub base_address: u32,
    pub write_pointer: usize,
    pub shadow: Option<ShadowRecord>,
}

/// Point-in-time view of both tiers, for diagnostics.
///
/// The cache and the store are read one after the other, so the two halves
/// may straddle a concurrent write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    pub captured_at: Timestamp,
    pub cache_capacity: usize,
    pub cache: Vec<(String, CacheEntry)>,
    pub store: Vec<ChannelLayout>,
}

impl LayoutSnapshot {
    pub(super) fn capture(controller: &HierarchyController) -> Self {
        let channels = controller.channels();
        let cache = controller
            .cache()
            .entries()
            .into_iter()
            .map(|e| (channels.name(e.channel).to_string(), e))
            .collect();

        let store = channels
            .iter()
            .filter_map(|c| {
                let store = controller.store();
                Some(ChannelLayout {
                    channel: c.id,
                    name: c.name.clone(),
                    base_address: store.base_address(c.id).ok()?,
                    write_pointer: store.write_pointer(c.id).ok()?,
                    shadow: store.shadow(c.id).ok()?,
                })
            })
            .collect();

        Self {
            captured_at: controller.now(),
            cache_capacity: controller.cache().capacity(),
            cache,
            store,
        }
    }
}

impl fmt::Display for LayoutSnapshot {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "=== Memory Layout @ {} ===", self.captured_at)?;
        writeln!(f, "[Cache {}/{}]", self.cache.len(), self.cache_capacity)?;
        for (name, entry) in &self.cache {
            writeln!(f, "{}: {} (last: {})", name, entry.value, entry.last_access)?;
        }
        writeln!(f, "[Store pointers]")?;
        for c in &self.store {
            write!(f, "{} @ {:#06x}: slot={}", c.name, c.base_address, c.write_pointer)?;
            if let Some(shadow) = c.shadow {
                write!(f, " shadow={} ({})", shadow.value, shadow.timestamp)?;
            }
            writeln!(f)?;
        }
        write!(f, "=====================")
    }
}
