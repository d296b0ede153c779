use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// What the binary drives in the foreground
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Serve the selected channel forever
    Monitor,
    /// Measure hit rates across a list of TTLs, then exit
    TtlSweep,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RuntimeConfig {
    /// Sleep between foreground requests
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    /// Sleep between background refresh sweeps
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Log the memory layout every N foreground iterations, 0 disables it
    #[serde(default = "default_layout_log_every")]
    pub layout_log_every: u64,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_mode")]
    pub mode: RunMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            request_interval_ms: default_request_interval_ms(),
            refresh_interval_ms: default_refresh_interval_ms(),
            layout_log_every: default_layout_log_every(),
            log_dir: default_log_dir(),
            mode: default_mode(),
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.request_interval_ms == 0 {
            return Err(Error::InvalidConfig("runtime.request_interval_ms cannot be 0".into()));
        }
        if self.refresh_interval_ms == 0 {
            return Err(Error::InvalidConfig("runtime.refresh_interval_ms cannot be 0".into()));
        }
        Ok(())
    }
}

// in ms
fn default_request_interval_ms() -> u64 {
    510
}
fn default_refresh_interval_ms() -> u64 {
    800
}
fn default_layout_log_every() -> u64 {
    5
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}
fn default_mode() -> RunMode {
    RunMode::Monitor
}
