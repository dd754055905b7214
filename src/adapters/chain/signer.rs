//! Node Signer - Swap Submission via the RPC Account
//!
//! Implements the `SwapSigner` port. The account is whatever the node or
//! wallet behind the RPC endpoint exposes through `eth_accounts`; the
//! router call goes out as `eth_sendTransaction`, so keys never touch
//! this process. A mined receipt with failed status is an error.

use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::{info, instrument};

use crate::ports::signer::{SwapCall, SwapSigner, TxReference};

use super::provider::SepoliaProvider;
use super::router::UniswapV2Router02;

/// Signs through the RPC endpoint's unlocked account.
pub struct NodeSigner {
    provider: SepoliaProvider,
}

impl NodeSigner {
    pub fn new(provider: SepoliaProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl SwapSigner for NodeSigner {
    async fn address(&self) -> Result<Address> {
        let accounts = self
            .provider
            .inner()
            .get_accounts()
            .await
            .context("Failed to query eth_accounts")?;
        accounts
            .first()
            .copied()
            .context("Signer exposes no accounts")
    }

    #[instrument(skip_all, fields(router = %call.router, value = %call.value))]
    async fn sign_and_send(&self, call: &SwapCall) -> Result<TxReference> {
        let deadline = u64::try_from(call.deadline.timestamp()).context("Deadline before epoch")?;
        let router = UniswapV2Router02::new(call.router, self.provider.inner());

        let pending = router
            .swapExactETHForTokens(
                call.min_amount_out,
                call.path.to_vec(),
                call.recipient,
                U256::from(deadline),
            )
            .from(call.recipient)
            .value(call.value)
            .send()
            .await
            .context("Transaction rejected")?;

        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, "Swap submitted, awaiting receipt");

        let receipt = pending
            .get_receipt()
            .await
            .context("Failed to get transaction receipt")?;

        if !receipt.status() {
            bail!("Transaction {tx_hash} reverted");
        }

        info!(%tx_hash, block = ?receipt.block_number, "Swap confirmed");
        Ok(TxReference {
            hash: tx_hash.to_string(),
            block_number: receipt.block_number,
        })
    }
}
