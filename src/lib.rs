//! A three-tier memory hierarchy for a handful of data channels.
//!
//! Requests are served from the cheapest tier holding a fresh value: a small
//! volatile [`Cache`], a slotted [`DurableStore`] on a byte-addressable
//! [`Medium`], and finally a [`Producer`]. Misses write through on the way
//! back. A background refresh keeps every channel populated.
//!
//! ```ignore
//! let config = TierConfig::new()?.validate()?;
//! let controller = TierBuilder::new(config).build()?;
//! let reading = controller.request(ChannelId(0x10))?;
//! ```
mod cache;
mod channel;
mod config;
mod constants;
mod errors;
mod hierarchy;
mod metrics;
mod producer;
mod runtime;
mod storage;
pub mod utils;

pub use cache::*;
pub use channel::*;
pub use config::*;
pub use constants::*;
pub use errors::*;
pub use hierarchy::*;
pub use metrics::*;
pub use producer::*;
pub use runtime::*;
pub use storage::*;
pub use utils::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
