//! Wallet Manager Use Case - Account Balance Refresh
//!
//! Queries one balance per registered token for a connected account
//! through the BalanceSource port. A token whose query fails is
//! recorded as zero so the dashboard always has a complete snapshot.

use std::sync::Arc;

use alloy::primitives::Address;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::domain::balances::BalanceSnapshot;
use crate::domain::token::TokenSymbol;
use crate::ports::balance_source::BalanceSource;

/// Fetches complete balance snapshots for an account.
pub struct WalletManager<B: BalanceSource> {
  source: Arc<B>,
}

impl<B: BalanceSource> WalletManager<B> {
  /// Create a new wallet manager.
  pub fn new(source: Arc<B>) -> Self {
    Self { source }
  }

  /// Fetch every registered token's balance for `account`.
  ///
  /// Never fails: individual query errors are logged and become `0`.
  #[instrument(skip(self), fields(%account))]
  pub async fn refresh(&self, account: Address) -> BalanceSnapshot {
    let mut snapshot = BalanceSnapshot::new();

    for symbol in TokenSymbol::ALL {
      let balance = match self.source.balance(account, symbol).await {
        Ok(balance) => balance,
        Err(e) => {
          warn!(token = %symbol, error = %e, "Balance query failed, recording zero");
          Decimal::ZERO
        }
      };
      snapshot.set(symbol, balance);
    }

    info!(tokens = TokenSymbol::ALL.len(), "Balances refreshed");
    snapshot
  }
}
