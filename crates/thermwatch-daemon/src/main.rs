//! Thermwatch Daemon
//!
//! Background service that samples sysfs thermal zones and hwmon fan inputs
//! once per second and serves the readings over a JSON API and a web
//! dashboard.

mod config;
mod monitor;
mod web;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use monitor::Monitor;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());
    let config = Config::load_or_default(&config_path)?;

    // Discover sensors once; the lists stay fixed for the process lifetime
    let monitor = Arc::new(Monitor::discover());
    info!(
        "Monitoring {} thermal zones and {} fan sensors",
        monitor.zones().len(),
        monitor.fan_sensors().len()
    );

    // Start the sampling loop with a shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sampler_monitor = monitor.clone();
    let sampler = tokio::spawn(async move {
        sample_loop(sampler_monitor, shutdown_rx).await;
    });

    // Setup Unix signal handlers
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    // Start web server
    let app = web::create_router(monitor);
    let addr: SocketAddr = config.listen.parse().context("Invalid listen address")?;
    let listener = TcpListener::bind(addr).await?;
    info!("Web server listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = sampler.await;

    Ok(())
}

/// Runs poll cycles forever, sleeping a full interval between cycles, until
/// the shutdown signal flips.
async fn sample_loop(monitor: Arc<Monitor>, mut shutdown: watch::Receiver<bool>) {
    loop {
        monitor.poll_cycle();
        tokio::select! {
            _ = tokio::time::sleep(monitor::POLL_INTERVAL) => {}
            _ = shutdown.changed() => {
                info!("Sampling loop stopped");
                return;
            }
        }
    }
}
