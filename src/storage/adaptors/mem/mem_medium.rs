use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::constants::ERASED_PATTERN;
use crate::storage::medium::check_range;
use crate::Medium;
use crate::Result;
use crate::StorageError;

/// Switches that make a [`MemoryMedium`] fail on demand.
///
/// Cloned handles share state, so a test can keep one after the medium has
/// been moved into a store.
#[derive(Debug, Clone, Default)]
pub struct FaultInjector {
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FaultInjector {
    pub fn fail_reads(
        &self,
        fail: bool,
    ) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(
        &self,
        fail: bool,
    ) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn reads_fail(&self) -> bool {
        self.fail_reads.load(Ordering::SeqCst)
    }

    fn writes_fail(&self) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
    }
}

/// RAM-backed medium, erased (all 0xFF) at creation.
#[derive(Debug)]
pub struct MemoryMedium {
    bytes: Vec<u8>,
    faults: FaultInjector,
}

impl MemoryMedium {
    pub fn new(capacity: u32) -> Self {
        Self {
            bytes: vec![ERASED_PATTERN[0]; capacity as usize],
            faults: FaultInjector::default(),
        }
    }

    /// Page-organized constructor: `page_size * total_pages` bytes.
    pub fn with_pages(
        page_size: u32,
        total_pages: u32,
    ) -> Self {
        Self::new(page_size * total_pages)
    }

    pub fn faults(&self) -> FaultInjector {
        self.faults.clone()
    }

    /// Resets every byte to 0xFF.
    pub fn erase(&mut self) {
        self.bytes.fill(0xFF);
    }

    /// Zeroes `len` bytes from `address`.
    pub fn clear(
        &mut self,
        address: u32,
        len: usize,
    ) -> Result<()> {
        check_range(address, len, self.capacity())?;
        let start = address as usize;
        self.bytes[start..start + len].fill(0x00);
        Ok(())
    }
}

impl Medium for MemoryMedium {
    fn capacity(&self) -> u32 {
        self.bytes.len() as u32
    }

    fn read(
        &self,
        address: u32,
        len: usize,
    ) -> Result<Vec<u8>> {
        if self.faults.reads_fail() {
            return Err(StorageError::Medium(format!("injected read failure at {address:#06x}")).into());
        }
        check_range(address, len, self.capacity())?;
        let start = address as usize;
        Ok(self.bytes[start..start + len].to_vec())
    }

    fn write(
        &mut self,
        address: u32,
        byte: u8,
    ) -> Result<()> {
        if self.faults.writes_fail() {
            return Err(StorageError::Medium(format!("injected write failure at {address:#06x}")).into());
        }
        check_range(address, 1, self.capacity())?;
        trace!("mem medium write {:#06x} = {:#04x}", address, byte);
        self.bytes[address as usize] = byte;
        Ok(())
    }
}
