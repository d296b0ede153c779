use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Volatile tier parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached channels
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// An entry idle for longer than this is dropped on next access
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            ttl_ms: default_ttl_ms(),
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig("cache.capacity must be at least 1".into()));
        }
        if self.ttl_ms == 0 {
            return Err(Error::InvalidConfig("cache.ttl_ms must be at least 1ms".into()));
        }
        Ok(())
    }
}

fn default_capacity() -> usize {
    2
}
// in ms
pub(super) fn default_ttl_ms() -> u64 {
    600
}
