//! Long-running flows around a shared [`HierarchyController`](crate::HierarchyController).
//!
//! The foreground [`RequestLoop`] serves the channel picked through
//! [`ChannelSwitch`], the background [`RefreshLoop`] keeps every channel
//! populated and [`TtlSweep`] measures hit rates across TTLs. All of them stop
//! on a `watch` shutdown signal; controller calls run on the blocking pool.
mod builder;
mod channel_switch;
mod refresh_loop;
mod request_loop;
mod selector;
mod sweep;
pub use builder::*;
pub use channel_switch::*;
pub use refresh_loop::*;
pub use request_loop::*;
pub use selector::*;
pub use sweep::*;

#[cfg(test)]
mod selector_test;
#[cfg(test)]
mod sweep_test;
