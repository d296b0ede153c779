use std::path::Path;

use tracing::debug;
use tracing::warn;

use crate::constants::MEDIUM_TREE;
use crate::storage::medium::check_range;
use crate::Medium;
use crate::Result;
use crate::StorageError;

/// Byte-addressable medium persisted in a sled tree.
///
/// One key per written address (big-endian `u32`); unwritten addresses read
/// as 0xFF, like an erased part. Last write wins per address.
pub struct SledMedium {
    tree: sled::Tree,
    capacity: u32,
}

impl SledMedium {
    pub fn new(
        tree: sled::Tree,
        capacity: u32,
    ) -> Self {
        Self { tree, capacity }
    }

    /// Opens (or creates) the medium database under `db_dir`.
    pub fn open(
        db_dir: impl AsRef<Path> + std::fmt::Debug,
        capacity: u32,
    ) -> Result<Self> {
        debug!("open sled medium from path: {:?}", &db_dir);
        let path = db_dir.as_ref().join("medium");
        let db = sled::Config::default()
            .path(&path)
            .cache_capacity(1024 * 1024) //1MB
            .flush_every_ms(Some(10))
            .use_compression(true)
            .compression_factor(1)
            .open()
            .map_err(|e| {
                warn!("Try to open DB at this location: {:?} and failed: {:?}", path, e);
                StorageError::from(e)
            })?;
        let tree = db.open_tree(MEDIUM_TREE).map_err(StorageError::from)?;
        Ok(Self::new(tree, capacity))
    }

    pub fn flush(&self) -> Result<()> {
        self.tree.flush().map_err(StorageError::from)?;
        Ok(())
    }
}

impl Medium for SledMedium {
    fn capacity(&self) -> u32 {
        self.capacity
    }

    fn read(
        &self,
        address: u32,
        len: usize,
    ) -> Result<Vec<u8>> {
        check_range(address, len, self.capacity)?;
        let mut out = vec![0xFF; len];
        let end = address + len as u32;
        for item in self.tree.range(address.to_be_bytes()..end.to_be_bytes()) {
            let (key, value) = item.map_err(StorageError::from)?;
            let key: [u8; 4] = key
                .as_ref()
                .try_into()
                .map_err(|_| StorageError::Db(format!("malformed medium key {:?}", key)))?;
            let offset = (u32::from_be_bytes(key) - address) as usize;
            out[offset] = value.first().copied().unwrap_or(0xFF);
        }
        Ok(out)
    }

    fn write(
        &mut self,
        address: u32,
        byte: u8,
    ) -> Result<()> {
        check_range(address, 1, self.capacity)?;
        self.tree.insert(address.to_be_bytes(), vec![byte]).map_err(StorageError::from)?;
        Ok(())
    }
}
