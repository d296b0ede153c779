use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// TTL evaluation harness parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SweepConfig {
    /// TTLs to evaluate, in order
    #[serde(default = "default_ttl_values_ms")]
    pub ttl_values_ms: Vec<u64>,

    /// How long each (TTL, channel) segment drives requests
    #[serde(default = "default_segment_ms")]
    pub segment_ms: u64,

    /// CSV destination for the results table
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            ttl_values_ms: default_ttl_values_ms(),
            segment_ms: default_segment_ms(),
            output: default_output(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ttl_values_ms.is_empty() {
            return Err(Error::InvalidConfig("sweep.ttl_values_ms cannot be empty".into()));
        }
        if self.ttl_values_ms.contains(&0) {
            return Err(Error::InvalidConfig("sweep.ttl_values_ms entries must be at least 1ms".into()));
        }
        if self.segment_ms == 0 {
            return Err(Error::InvalidConfig("sweep.segment_ms cannot be 0".into()));
        }
        Ok(())
    }
}

fn default_ttl_values_ms() -> Vec<u64> {
    vec![500, 1000, 1500, 2000, 2500, 3000]
}
fn default_segment_ms() -> u64 {
    30_000
}
fn default_output() -> PathBuf {
    PathBuf::from("./ttl_test_results.csv")
}
