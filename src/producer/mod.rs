//! Origin tier: the expensive source every miss eventually falls through to.
mod gas;
mod scripted;
mod sensor;
mod simulated;
pub use gas::*;
pub use scripted::*;
pub use sensor::*;
pub use simulated::*;


#[cfg(test)]
use mockall::automock;

use crate::ChannelId;

/// Supplies a fresh reading for a channel.
///
/// Calls may be slow (tens of milliseconds) and are made synchronously from
/// both the foreground and the background flow. `None` means the source
/// could not produce a value right now; `Some(0.0)` is a valid reading.
#[cfg_attr(test, automock)]
pub trait Producer: Send + Sync + 'static {
    fn read(
        &self,
        channel: ChannelId,
    ) -> Option<f64>;
}
