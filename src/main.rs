use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tiercache::file_io::open_file_for_append;
use tiercache::{
    start_metrics_server, write_csv, ChannelSelector, ChannelSwitch, Error, RefreshLoop, RequestLoop, Result, RunMode,
    TierBuilder, TierConfig, TtlSweep, LOG_FILE_NAME,
};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let mut config = TierConfig::new()?;
    if let Some(path) = std::env::args().nth(1) {
        config = config.with_override_config(&path)?;
    }
    let config = config.validate()?;

    // Initializing Logs
    let _guard = init_observability(&config.runtime.log_dir)?;
    info!("loaded {:?}", config);

    // Initializing Shutdown Signal
    let (graceful_tx, graceful_rx) = watch::channel(());

    let controller = Arc::new(TierBuilder::new(config.clone()).build()?);
    let metrics_handle = start_metrics_server(&config, graceful_rx.clone());

    let refresh_handle = RefreshLoop::new(
        controller.clone(),
        Duration::from_millis(config.runtime.refresh_interval_ms),
        graceful_rx.clone(),
    )
    .spawn();

    info!("Application started. Waiting for CTRL+C signal...");
    // Listen on Shutdown Signal
    tokio::spawn(async {
        if let Err(e) = graceful_shutdown(graceful_tx).await {
            error!("Failed to shutdown: {:?}", e);
        }
    });

    let request_interval = Duration::from_millis(config.runtime.request_interval_ms);
    match config.runtime.mode {
        RunMode::Monitor => {
            let selector = Arc::new(ChannelSelector::new(controller.channels())?);
            let (switch, press_tx) = ChannelSwitch::new(selector.clone(), graceful_rx.clone());
            let switch_handle = switch.spawn();
            tokio::spawn(async move {
                if let Err(e) = forward_button_presses(press_tx).await {
                    error!("button listener failed: {:?}", e);
                }
            });
            info!("send SIGUSR1 to switch to the next channel");

            let iterations = RequestLoop::new(controller.clone(), selector, request_interval, graceful_rx.clone())
                .with_layout_log_every(config.runtime.layout_log_every)
                .run()
                .await?;
            info!("monitor stopped after {} requests", iterations);
            switch_handle.abort();
        }
        RunMode::TtlSweep => {
            let results = TtlSweep::new(
                controller.clone(),
                config.sweep.ttl_values_ms.clone(),
                Duration::from_millis(config.sweep.segment_ms),
                request_interval,
                graceful_rx.clone(),
            )
            .run()
            .await?;
            write_csv(&results, &config.sweep.output).await?;
            // The sweep ends on its own; stop the refresh loop with it
            refresh_handle.abort();
        }
    }

    if let Err(e) = refresh_handle.await {
        if !e.is_cancelled() {
            error!("refresh loop failed: {:?}", e);
        }
    }
    if let Some(handle) = metrics_handle {
        handle.abort();
    }

    println!("Exiting program.");
    Ok(())
}

async fn graceful_shutdown(graceful_tx: watch::Sender<()>) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }

    graceful_tx.send(()).map_err(|e| {
        error!("Failed to send shutdown signal: {}", e);
        Error::SignalSenderClosed(format!("Failed to send shutdown signal: {}", e))
    })?;

    info!("Shutdown completed");
    Ok(())
}

/// Each SIGUSR1 is one button press.
async fn forward_button_presses(press_tx: mpsc::Sender<()>) -> Result<()> {
    let mut presses = signal(SignalKind::user_defined1())?;
    while presses.recv().await.is_some() {
        if press_tx.send(()).await.is_err() {
            break;
        }
    }
    Ok(())
}

pub fn init_observability(log_dir: &Path) -> Result<WorkerGuard> {
    let log_file = open_file_for_append(&log_dir.join(LOG_FILE_NAME))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(EnvFilter::from_default_env());
    let stdout_layer = tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(file_layer).with(stdout_layer).init();

    Ok(guard)
}
