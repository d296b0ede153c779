use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::async_task::spawn_task;
use crate::{ChannelId, HierarchyController, Result};

/// Background flow: refreshes every channel, sleeps, repeats.
pub struct RefreshLoop {
    controller: Arc<HierarchyController>,
    interval: Duration,
    shutdown_signal: watch::Receiver<()>,
}

impl RefreshLoop {
    pub fn new(
        controller: Arc<HierarchyController>,
        interval: Duration,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            controller,
            interval,
            shutdown_signal,
        }
    }

    /// Runs until the shutdown signal fires.
    pub async fn run(mut self) -> Result<()> {
        info!("refresh loop started, every {:?}", self.interval);
        loop {
            let unavailable = self.sweep_once().await?;
            if !unavailable.is_empty() {
                debug!("refresh sweep: {} channel(s) unavailable", unavailable.len());
            }

            tokio::select! {
                _ = self.shutdown_signal.changed() => {
                    info!("refresh loop received shutdown signal");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// One pass over every channel. Returns the channels that were unavailable.
    pub async fn sweep_once(&self) -> Result<Vec<ChannelId>> {
        let controller = self.controller.clone();
        let unavailable = tokio::task::spawn_blocking(move || controller.refresh_all()).await?;
        trace!("refresh sweep done");
        Ok(unavailable)
    }

    /// Spawns the loop as a named task.
    pub fn spawn(self) -> JoinHandle<()> {
        spawn_task("refresh_loop", move || self.run())
    }
}
