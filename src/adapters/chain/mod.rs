//! Chain Adapters - Sepolia Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with chain-ID validation
//! - Uniswap V2 router quotes (`getAmountsOut`)
//! - Swap submission through the RPC account (`swapExactETHForTokens`)
//! - Native and ERC-20 balance queries

pub mod balances;
pub mod provider;
pub mod router;
pub mod signer;

pub use balances::ChainBalances;
pub use provider::SepoliaProvider;
pub use router::RouterOracle;
pub use signer::NodeSigner;
