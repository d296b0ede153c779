use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::ChannelSelector;
use crate::{HierarchyController, Reading, Result};

/// Foreground flow: requests the selected channel at a fixed cadence and
/// logs what came back.
pub struct RequestLoop {
    controller: Arc<HierarchyController>,
    selector: Arc<ChannelSelector>,
    interval: Duration,
    layout_log_every: u64,
    shutdown_signal: watch::Receiver<()>,
}

impl RequestLoop {
    pub fn new(
        controller: Arc<HierarchyController>,
        selector: Arc<ChannelSelector>,
        interval: Duration,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            controller,
            selector,
            interval,
            layout_log_every: 0,
            shutdown_signal,
        }
    }

    /// Logs the memory layout every `every` iterations; 0 disables it.
    pub fn with_layout_log_every(
        mut self,
        every: u64,
    ) -> Self {
        self.layout_log_every = every;
        self
    }

    /// Runs until the shutdown signal fires and returns the iteration count.
    pub async fn run(mut self) -> Result<u64> {
        info!("request loop started, every {:?}", self.interval);
        let mut iteration = 0u64;
        loop {
            iteration += 1;
            self.step(iteration).await?;

            tokio::select! {
                _ = self.shutdown_signal.changed() => {
                    info!("request loop received shutdown signal after {} iterations", iteration);
                    return Ok(iteration);
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Serves the selected channel once.
    ///
    /// `Unavailable` is logged and swallowed; any other error ends the loop.
    pub async fn step(
        &self,
        iteration: u64,
    ) -> Result<Option<Reading>> {
        let channel = self.selector.current();
        let controller = self.controller.clone();
        let started = Instant::now();
        let outcome = tokio::task::spawn_blocking(move || controller.request(channel)).await?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let name = self.controller.channels().name(channel).to_string();
        let reading = match outcome {
            Ok(reading) => {
                let m = self.controller.metrics();
                info!(
                    "{}: {} ({}) @ {} | hit {:.1}% cache {:.1}% store {:.1}% | {:.2}ms",
                    name,
                    reading.value,
                    reading.source,
                    reading.timestamp,
                    m.overall_hit_rate * 100.0,
                    m.cache_hit_rate * 100.0,
                    m.store_hit_rate * 100.0,
                    latency_ms
                );
                Some(reading)
            }
            Err(e) if e.is_unavailable() => {
                warn!("{}: unavailable ({:.2}ms)", name, latency_ms);
                None
            }
            Err(e) => return Err(e),
        };

        if self.layout_log_every > 0 && iteration % self.layout_log_every == 0 {
            debug!("\n{}", self.controller.layout());
        }
        Ok(reading)
    }
}
