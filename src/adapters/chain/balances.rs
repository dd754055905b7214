//! Chain Balances - Native and ERC-20 Balance Queries
//!
//! Implements the `BalanceSource` port: `eth_getBalance` for the native
//! token, `balanceOf` for every registered ERC-20.

use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::sol;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::amount::from_base_units;
use crate::domain::token::TokenSymbol;
use crate::ports::balance_source::BalanceSource;

use super::provider::SepoliaProvider;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract ERC20 {
        function balanceOf(address) external view returns (uint256);
    }
}

/// On-chain balance lookups through the shared provider.
pub struct ChainBalances {
    provider: SepoliaProvider,
}

impl ChainBalances {
    pub fn new(provider: SepoliaProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl BalanceSource for ChainBalances {
    async fn balance(&self, account: Address, token: TokenSymbol) -> Result<Decimal> {
        let meta = token.token();
        let raw = if token.is_native() {
            self.provider
                .inner()
                .get_balance(account)
                .await
                .context("eth_getBalance failed")?
        } else {
            ERC20::new(meta.address, self.provider.inner())
                .balanceOf(account)
                .call()
                .await
                .with_context(|| format!("balanceOf failed for {token}"))?
                ._0
        };

        from_base_units(raw, meta.decimals)
            .with_context(|| format!("{token} balance {raw} out of range"))
    }
}
