//! AYA Swap Engine - Entry Point
//!
//! Initializes configuration, logging, the RPC connection and the
//! dashboard session service, then serves the JSON API until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Connect to the RPC endpoint (chain ID checked)
//! 4. Create router oracle, node signer, balance source, Gemini client
//! 5. Build the Dashboard session (demo mode if configured)
//! 6. Spawn RPC health poller (drives /ready)
//! 7. Spawn API server (/api/*, /live, /ready, /metrics)
//! 8. Wait for SIGINT → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use aya_swap_engine::adapters::ai::GeminiClient;
use aya_swap_engine::adapters::chain::{ChainBalances, NodeSigner, RouterOracle, SepoliaProvider};
use aya_swap_engine::adapters::http::{ApiState, server};
use aya_swap_engine::adapters::metrics::{HealthState, MetricsRegistry};
use aya_swap_engine::config;
use aya_swap_engine::usecases::dashboard::Dashboard;

/// Interval between RPC health probes.
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        chain_id = config.chain.chain_id,
        router = %config.chain.router_address,
        "Starting AYA swap engine"
    );

    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    // ── 3. Connect to the RPC endpoint ──────────────────────
    let provider = SepoliaProvider::connect(&config.chain)
        .await
        .context("Failed to connect to RPC")?;

    // ── 4. Port adapters ────────────────────────────────────
    let oracle = Arc::new(RouterOracle::new(provider.clone(), config.chain.router_address));
    let signer = Arc::new(NodeSigner::new(provider.clone()));
    let balances = Arc::new(ChainBalances::new(provider.clone()));
    let generator =
        Arc::new(GeminiClient::from_config(&config.ai).context("Failed to create Gemini client")?);

    // ── 5. Dashboard session ────────────────────────────────
    let dashboard = Arc::new(
        Dashboard::new(&config, oracle, signer, balances, generator)
            .context("Failed to build dashboard session")?,
    );
    if config.app.start_in_demo {
        dashboard.enter_demo().await;
    }

    let metrics = if config.server.metrics_enabled {
        Some(Arc::new(MetricsRegistry::new().context("Failed to register metrics")?))
    } else {
        None
    };
    let health = HealthState::new();

    // ── 6. RPC health poller ────────────────────────────────
    let poll_health = health.clone();
    let mut poll_shutdown = shutdown_tx.subscribe();
    let poll_handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = poll_shutdown.recv() => break,
                () = tokio::time::sleep(HEALTH_POLL_INTERVAL) => {
                    poll_health.set_chain_healthy(provider.is_healthy().await);
                }
            }
        }
    });

    // ── 7. API server ───────────────────────────────────────
    let api_state = ApiState {
        dashboard,
        metrics,
        health: health.clone(),
    };
    let server_shutdown = shutdown_tx.subscribe();
    let bind_address = config.server.bind_address.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::serve(api_state, bind_address, server_shutdown).await {
            error!(error = %e, "API server failed");
        }
    });

    info!("Engine running");

    // ── 8. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    health.set_chain_healthy(false);
    let _ = shutdown_tx.send(());

    let _ = tokio::time::timeout(Duration::from_secs(5), server_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(1), poll_handle).await;

    info!("Shutdown complete");
    Ok(())
}
