//! Balance Source Port - Per-token Account Balances

use alloy::primitives::Address;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::token::TokenSymbol;

/// Trait for balance providers (native balance or ERC-20 `balanceOf`).
#[async_trait]
pub trait BalanceSource: Send + Sync + 'static {
  /// Whole-unit balance of `token` held by `account`.
  async fn balance(&self, account: Address, token: TokenSymbol) -> anyhow::Result<Decimal>;
}
