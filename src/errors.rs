//! Memory Hierarchy Error Hierarchy
//!
//! Defines error types for the tiered cache engine, categorized by the tier
//! that produces them and by operational concerns (configuration, runtime).
//!
//! Only [`HierarchyError::Unavailable`] is a runtime condition a caller is
//! expected to handle. Store misses and medium I/O failures are recovered
//! inside the durable tier and never reach the caller of `request`.

use config::ConfigError;
use tokio::task::JoinError;

use crate::ChannelId;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Read/refresh path failures
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    /// Durable tier and physical medium failures
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration loading failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration validation failures
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Background task panicked or was cancelled
    #[error("Background task failed: {0}")]
    TaskFailed(#[from] JoinError),

    #[error("{0}")]
    SignalSenderClosed(String),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// The producer could not supply a reading; nothing was written anywhere.
    #[error("Channel {channel} unavailable: producer returned no reading")]
    Unavailable { channel: ChannelId },

    /// The channel was never configured. This is a programming error.
    #[error("Unknown channel {0}")]
    UnknownChannel(ChannelId),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Access outside the medium's linear address space
    #[error("Address {address:#06x} (+{len}) outside medium of {capacity} bytes")]
    AddressOutOfRange { address: u32, len: usize, capacity: u32 },

    /// Physical read/write failure reported by the medium
    #[error("Medium I/O failure: {0}")]
    Medium(String),

    /// Embedded database errors (sled-backed medium)
    #[error("Embedded database error: {0}")]
    Db(String),
}

impl From<sled::Error> for StorageError {
    fn from(e: sled::Error) -> Self {
        StorageError::Db(e.to_string())
    }
}

impl Error {
    /// Returns true when the error means "producer had nothing", the only
    /// condition the runtime loops treat as routine.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Hierarchy(HierarchyError::Unavailable { .. }))
    }
}
