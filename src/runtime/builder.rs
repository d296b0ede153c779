//! Assembles a [`HierarchyController`] from a [`TierConfig`].
//!
//! Every collaborator has a default picked from the configuration
//! (monotonic clock, medium backend, simulated producer) and can be
//! overridden before `build()`.
//!
//! ```ignore
//! let controller = TierBuilder::new(config)
//!     .producer(my_sensors)
//!     .build()?;
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::async_task::spawn_task;
use crate::constants::SIMULATED_UNAVAILABLE_RATE;
use crate::metrics;
use crate::time::{Clock, MonotonicClock};
use crate::{
    Cache, ChannelRegistry, DurableStore, HierarchyController, Medium, MediumBackend, MemoryMedium, Producer, Result,
    SimulatedProducer, SledMedium, TierConfig,
};

pub struct TierBuilder {
    config: TierConfig,
    clock: Option<Arc<dyn Clock>>,
    medium: Option<Box<dyn Medium>>,
    producer: Option<Box<dyn Producer>>,
}

impl TierBuilder {
    /// `config` is expected to be validated already.
    pub fn new(config: TierConfig) -> Self {
        Self {
            config,
            clock: None,
            medium: None,
            producer: None,
        }
    }

    pub fn clock(
        mut self,
        clock: Arc<dyn Clock>,
    ) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn medium(
        mut self,
        medium: impl Medium,
    ) -> Self {
        self.medium = Some(Box::new(medium));
        self
    }

    pub fn producer(
        mut self,
        producer: impl Producer,
    ) -> Self {
        self.producer = Some(Box::new(producer));
        self
    }

    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    /// Builds the controller, opening the configured medium if none was given.
    ///
    /// # Errors
    /// Sled open failures and channel layouts that do not fit the medium.
    pub fn build(self) -> Result<HierarchyController> {
        let TierConfig { cache, store, channels, .. } = &self.config;
        let registry = ChannelRegistry::from_config(channels);
        let clock = self.clock.unwrap_or_else(|| Arc::new(MonotonicClock::new()));

        let medium: Box<dyn Medium> = match self.medium {
            Some(medium) => medium,
            None => match store.backend {
                MediumBackend::Memory => Box::new(MemoryMedium::with_pages(store.page_size, store.total_pages)),
                MediumBackend::Sled => Box::new(SledMedium::open(&store.db_dir, store.capacity())?),
            },
        };

        let producer = self
            .producer
            .unwrap_or_else(|| Box::new(SimulatedProducer::new(&registry, SIMULATED_UNAVAILABLE_RATE)));

        let durable = DurableStore::new(medium, &registry, store.page_size, store.ttl_ms, clock.clone())?;
        let volatile = Cache::new(cache.capacity, cache.ttl_ms, clock.clone());
        info!(
            "hierarchy ready: {} channels, cache {} entries / {}ms, store {:?} / {}ms",
            registry.len(),
            cache.capacity,
            cache.ttl_ms,
            store.backend,
            store.ttl_ms
        );

        Ok(HierarchyController::new(registry, volatile, durable, producer, clock))
    }
}

/// Launches the Prometheus endpoint when monitoring is enabled.
pub fn start_metrics_server(
    config: &TierConfig,
    shutdown_signal: watch::Receiver<()>,
) -> Option<JoinHandle<()>> {
    if !config.monitoring.prometheus_enabled {
        return None;
    }
    let addr = config.monitoring.socket_addr();
    Some(spawn_task("metrics_server", move || async move {
        metrics::start_server(addr, shutdown_signal).await;
        Ok(())
    }))
}
