use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Which byte-addressable medium backs the durable tier
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediumBackend {
    /// RAM array, lost on exit
    Memory,
    /// sled database under `db_dir`, survives restarts
    Sled,
}

/// Durable tier parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    /// A shadow record older than this makes the next write recycle to slot 0
    #[serde(default = "super::cache::default_ttl_ms")]
    pub ttl_ms: u64,

    /// Bytes per medium page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Number of pages in the medium
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,

    #[serde(default = "default_backend")]
    pub backend: MediumBackend,

    /// Database directory for the sled backend
    #[serde(default = "default_db_dir")]
    pub db_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_ms: super::cache::default_ttl_ms(),
            page_size: default_page_size(),
            total_pages: default_total_pages(),
            backend: default_backend(),
            db_dir: default_db_dir(),
        }
    }
}

impl StoreConfig {
    /// Medium size in bytes
    pub fn capacity(&self) -> u32 {
        self.page_size.saturating_mul(self.total_pages)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ttl_ms == 0 {
            return Err(Error::InvalidConfig("store.ttl_ms must be at least 1ms".into()));
        }
        if self.page_size == 0 || self.total_pages == 0 {
            return Err(Error::InvalidConfig(
                "store.page_size and store.total_pages must be non-zero".into(),
            ));
        }
        if self.page_size.checked_mul(self.total_pages).is_none() {
            return Err(Error::InvalidConfig(format!(
                "medium of {} pages x {} bytes overflows the address space",
                self.total_pages, self.page_size
            )));
        }
        if self.backend == MediumBackend::Sled && self.db_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("store.db_dir is required for the sled backend".into()));
        }
        Ok(())
    }
}

fn default_page_size() -> u32 {
    32
}
fn default_total_pages() -> u32 {
    128
}
fn default_backend() -> MediumBackend {
    MediumBackend::Memory
}
fn default_db_dir() -> PathBuf {
    PathBuf::from("./db")
}
