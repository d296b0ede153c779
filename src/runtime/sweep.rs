//! TTL evaluation harness.
//!
//! For every TTL and every channel: apply the TTL, reset the counters, drive
//! foreground requests for one segment and record the resulting hit rates.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::file_io::write_into_file;
use crate::{ChannelId, HierarchyController, MetricsSnapshot, Result};

pub const CSV_HEADER: &str = "TTL (ms),Total Hit Rate (%),Cache Hit Rate (%),Store Hit Rate (%),Cache Hits,Store Hits,Total Accesses,Sensor,Address";

/// Hit rates of one (TTL, channel) segment. Rates are percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub ttl_ms: u64,
    pub total_hit_rate: f64,
    pub cache_hit_rate: f64,
    pub store_hit_rate: f64,
    pub cache_hits: u64,
    pub store_hits: u64,
    pub total: u64,
    pub channel: ChannelId,
    pub channel_name: String,
}

impl SweepResult {
    fn from_snapshot(
        ttl_ms: u64,
        channel: ChannelId,
        channel_name: &str,
        m: MetricsSnapshot,
    ) -> Self {
        Self {
            ttl_ms,
            total_hit_rate: m.overall_hit_rate * 100.0,
            cache_hit_rate: m.cache_hit_rate * 100.0,
            store_hit_rate: m.store_hit_rate * 100.0,
            cache_hits: m.cache_hits,
            store_hits: m.store_hits,
            total: m.total,
            channel,
            channel_name: channel_name.to_string(),
        }
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{:.2},{:.2},{:.2},{},{},{},{},{}",
            self.ttl_ms,
            self.total_hit_rate,
            self.cache_hit_rate,
            self.store_hit_rate,
            self.cache_hits,
            self.store_hits,
            self.total,
            self.channel_name,
            self.channel
        )
    }
}

pub fn render_csv(results: &[SweepResult]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + results.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for r in results {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", r.to_csv_row());
    }
    out
}

pub async fn write_csv(
    results: &[SweepResult],
    path: &Path,
) -> Result<()> {
    write_into_file(path, render_csv(results).into_bytes()).await?;
    info!("sweep results saved to {:?}", path);
    Ok(())
}

pub struct TtlSweep {
    controller: Arc<HierarchyController>,
    ttl_values_ms: Vec<u64>,
    segment: Duration,
    request_interval: Duration,
    shutdown_signal: watch::Receiver<()>,
}

impl TtlSweep {
    pub fn new(
        controller: Arc<HierarchyController>,
        ttl_values_ms: Vec<u64>,
        segment: Duration,
        request_interval: Duration,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            controller,
            ttl_values_ms,
            segment,
            request_interval,
            shutdown_signal,
        }
    }

    /// Runs every segment in order.
    ///
    /// A shutdown cuts the current segment short; the results collected so
    /// far, the partial segment excluded, are returned.
    pub async fn run(mut self) -> Result<Vec<SweepResult>> {
        let channels = self.controller.channels().clone();
        let mut results = Vec::with_capacity(self.ttl_values_ms.len() * channels.len());

        for ttl_ms in self.ttl_values_ms.clone() {
            for channel in channels.iter() {
                info!("sweep: ttl {}ms on {}", ttl_ms, channel.name);
                self.controller.set_ttl(ttl_ms);
                self.controller.reset_metrics();

                if !self.drive_segment(channel.id).await? {
                    info!("sweep interrupted at ttl {}ms", ttl_ms);
                    return Ok(results);
                }

                let result = SweepResult::from_snapshot(ttl_ms, channel.id, &channel.name, self.controller.metrics());
                info!(
                    "sweep: ttl {}ms {}: hit {:.2}% cache {:.2}% store {:.2}% over {} requests",
                    ttl_ms, channel.name, result.total_hit_rate, result.cache_hit_rate, result.store_hit_rate, result.total
                );
                results.push(result);
            }
        }
        Ok(results)
    }

    /// Returns false when shut down before the segment ended.
    async fn drive_segment(
        &mut self,
        channel: ChannelId,
    ) -> Result<bool> {
        let deadline = Instant::now() + self.segment;
        while Instant::now() < deadline {
            let controller = self.controller.clone();
            match tokio::task::spawn_blocking(move || controller.request(channel)).await? {
                Ok(_) => {}
                Err(e) if e.is_unavailable() => warn!("sweep: {} unavailable", channel),
                Err(e) => return Err(e),
            }

            tokio::select! {
                _ = self.shutdown_signal.changed() => return Ok(false),
                _ = tokio::time::sleep(self.request_interval) => {}
            }
        }
        Ok(true)
    }
}
