mod hit_rate;
pub use hit_rate::*;


use std::net::SocketAddr;

use lazy_static::lazy_static;
use prometheus::{exponential_buckets, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};
use tokio::sync::watch;
use tracing::{error, info, warn};
use warp::{Filter, Rejection, Reply};

lazy_static! {
    pub static ref REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("tier_requests", "Foreground requests by the tier that served them"),
        &["source"]
    )
    .expect("metric can not be created");

    pub static ref REFRESHES: IntCounterVec = IntCounterVec::new(
        Opts::new("tier_refreshes", "Background refreshes by outcome"),
        &["outcome"]
    )
    .expect("metric can not be created");

    pub static ref REQUEST_LATENCY: HistogramVec = HistogramVec::new(
        HistogramOpts::new("tier_request_latency_ms", "Histogram of request latency in ms")
            .buckets(exponential_buckets(0.01, 4.0, 10).expect("valid buckets")),
        &["source"]
    )
    .expect("metric can not be created");

    pub static ref CACHE_EVICTIONS: IntCounter =
        IntCounter::new("tier_cache_evictions", "Capacity evictions from the volatile tier")
            .expect("metric can not be created");

    pub static ref STORE_RECYCLES: IntCounter =
        IntCounter::new("tier_store_recycles", "Writes that restarted a channel ring at slot 0")
            .expect("metric can not be created");

    pub static ref MEDIUM_IO_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("tier_medium_io_errors", "Swallowed physical medium failures"),
        &["op"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

fn register_custom_metrics(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(REQUESTS.clone()))?;
    registry.register(Box::new(REFRESHES.clone()))?;
    registry.register(Box::new(REQUEST_LATENCY.clone()))?;
    registry.register(Box::new(CACHE_EVICTIONS.clone()))?;
    registry.register(Box::new(STORE_RECYCLES.clone()))?;
    registry.register(Box::new(MEDIUM_IO_ERRORS.clone()))?;
    Ok(())
}

/// Serves `/metrics` until `shutdown_signal` fires.
pub async fn start_server(
    addr: SocketAddr,
    mut shutdown_signal: watch::Receiver<()>,
) {
    if let Err(e) = register_custom_metrics(&REGISTRY) {
        warn!("metrics already registered: {:?}", e);
    }

    let metrics_route = warp::path!("metrics").and_then(metrics_handler);

    info!("metrics server listening on {}", addr);
    let (_, server) = warp::serve(metrics_route).bind_with_graceful_shutdown(addr, async move {
        let _ = shutdown_signal.changed().await;
    });
    server.await;
    info!("metrics server stopped");
}

async fn metrics_handler() -> Result<impl Reply, Rejection> {
    Ok(encode_metrics(&REGISTRY))
}

pub(crate) fn encode_metrics(registry: &Registry) -> String {
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        error!("could not encode custom metrics: {}", e);
    };
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            error!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}
