//! Signer Port - Account Identity and Swap Submission
//!
//! The engine never holds keys. An external signer (the wallet or node
//! behind the JSON-RPC endpoint) supplies the account address and signs
//! and broadcasts the router call.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A fully priced `swapExactETHForTokens` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapCall {
  /// Router contract receiving the call.
  pub router: Address,
  /// Native value sent with the call (base units).
  pub value: U256,
  /// Output floor enforced by the router (base units).
  pub min_amount_out: U256,
  /// Two-token router path (wrapped native first).
  pub path: [Address; 2],
  /// Account receiving the output tokens.
  pub recipient: Address,
  /// Router rejects execution after this instant.
  pub deadline: DateTime<Utc>,
}

/// Confirmed transaction returned by the signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReference {
  /// Transaction hash, 0x-prefixed hex.
  pub hash: String,
  /// Block the transaction was mined in, when reported.
  pub block_number: Option<u64>,
}

/// Trait for external transaction signers.
#[async_trait]
pub trait SwapSigner: Send + Sync + 'static {
  /// The account the signer controls.
  async fn address(&self) -> anyhow::Result<Address>;

  /// Sign, broadcast and wait for the call to be mined.
  ///
  /// # Errors
  /// Returns the underlying reason when the user rejects, the node
  /// refuses, or the transaction reverts.
  async fn sign_and_send(&self, call: &SwapCall) -> anyhow::Result<TxReference>;
}
