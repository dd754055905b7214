//! Price Oracle Port - Live Router Quotes
//!
//! Defines the trait for asking the on-chain router how much of the
//! output token an input amount buys along a two-token path. Base-unit
//! conversion is the adapter's job; the port speaks whole-unit decimals.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::token::TokenSymbol;

/// Why the live oracle could not price a trade.
///
/// Internal only: every variant triggers the simulated fallback
/// instead of surfacing to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
  /// Transport or provider failure.
  #[error("oracle unavailable: {0}")]
  Unavailable(String),
  /// The router call reverted (no pair, no liquidity).
  #[error("router reverted: {0}")]
  Reverted(String),
  /// The path cannot be routed (e.g. identical endpoints).
  #[error("malformed path: {0}")]
  MalformedPath(String),
  /// Amount could not be converted to or from base units.
  #[error("amount conversion failed: {0}")]
  Conversion(String),
}

/// Trait for live price oracles.
#[async_trait]
pub trait PriceOracle: Send + Sync + 'static {
  /// Expected output for `amount_in` of `from`, in whole units of `to`.
  async fn amount_out(
    &self,
    from: TokenSymbol,
    to: TokenSymbol,
    amount_in: Decimal,
  ) -> Result<Decimal, OracleError>;
}
