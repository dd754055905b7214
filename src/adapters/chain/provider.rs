//! Sepolia RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the JSON-RPC connection to the Sepolia testnet via alloy-rs.
//! Validates the chain ID at startup and exposes a shared provider
//! instance for quotes, balances and swap submission.
//!
//! The provider is boxed (`RootProvider<BoxTransport>`) so contract
//! bindings across the adapter layer share one concrete type.

use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::transports::BoxTransport;
use anyhow::{Context, Result, bail};
use tracing::{info, instrument};

use crate::config::ChainConfig;

/// Type-erased alloy provider shared by all chain adapters.
pub type ChainProvider = RootProvider<BoxTransport>;

/// Shared Sepolia RPC provider backed by alloy-rs 0.9.
///
/// All chain adapters share a single provider instance to avoid
/// redundant connections and enable connection pooling.
#[derive(Clone)]
pub struct SepoliaProvider {
    /// The alloy HTTP provider (boxed transport).
    provider: ChainProvider,
    /// Chain ID confirmed at startup.
    chain_id: u64,
}

impl SepoliaProvider {
    /// Connect to the configured RPC endpoint and validate the chain ID.
    ///
    /// The URL comes from `config.toml` (never hardcoded). A node on the
    /// wrong chain is rejected before any quote is served.
    #[instrument(skip_all)]
    pub async fn connect(config: &ChainConfig) -> Result<Self> {
        let url = config.rpc_url.parse().context("Invalid RPC URL")?;

        // alloy 0.9: on_http() is synchronous
        let provider = ProviderBuilder::new().on_http(url).boxed();

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        if chain_id != config.chain_id {
            bail!(
                "Expected chain_id={}, RPC endpoint reports {chain_id}",
                config.chain_id
            );
        }

        info!(chain_id, "Connected to RPC");

        Ok(Self { provider, chain_id })
    }

    /// A handle to the alloy provider (cheap clone).
    pub fn inner(&self) -> ChainProvider {
        self.provider.clone()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}
