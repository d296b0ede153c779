//! Byte-addressable persistent medium seam.
//!
//! The durable tier talks to storage only through [`Medium`]: a linear
//! address space organized externally into fixed-size pages, written one byte
//! at a time and read as contiguous blocks.

#[cfg(test)]
use mockall::automock;

use crate::Result;
use crate::StorageError;

#[cfg_attr(test, automock)]
pub trait Medium: Send + 'static {
    /// Size of the linear address space in bytes
    fn capacity(&self) -> u32;

    /// Reads `len` contiguous bytes starting at `address`.
    fn read(
        &self,
        address: u32,
        len: usize,
    ) -> Result<Vec<u8>>;

    /// Writes a single byte.
    fn write(
        &mut self,
        address: u32,
        byte: u8,
    ) -> Result<()>;
}

/// Rejects accesses that do not fit in `[0, capacity)`.
pub(crate) fn check_range(
    address: u32,
    len: usize,
    capacity: u32,
) -> Result<()> {
    let end = address as u64 + len as u64;
    if end > capacity as u64 {
        return Err(StorageError::AddressOutOfRange {
            address,
            len,
            capacity,
        }
        .into());
    }
    Ok(())
}
