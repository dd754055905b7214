//! Static price table and the simulated price source.
//!
//! The table backs two consumers: the portfolio valuator (USD values)
//! and the simulated quote used when the live router cannot be reached
//! or the session runs in demo mode. It is total over the registry by
//! construction, so simulation has no failure mode.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use super::token::TokenSymbol;

/// Problems found while building a price table from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceTableError {
    #[error("no price configured for {0}")]
    Missing(TokenSymbol),
    #[error("price for {0} must be positive, got {1}")]
    NonPositive(TokenSymbol, Decimal),
}

/// USD price per registered token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    /// Indexed in `TokenSymbol::ALL` order.
    prices: [Decimal; 4],
}

impl PriceTable {
    /// Build a table from a symbol → price map.
    ///
    /// Every registered symbol must be present with a positive price.
    pub fn new(prices: &BTreeMap<TokenSymbol, Decimal>) -> Result<Self, PriceTableError> {
        let mut table = [Decimal::ZERO; 4];
        for (slot, symbol) in table.iter_mut().zip(TokenSymbol::ALL) {
            let price = *prices
                .get(&symbol)
                .ok_or(PriceTableError::Missing(symbol))?;
            if price <= Decimal::ZERO {
                return Err(PriceTableError::NonPositive(symbol, price));
            }
            *slot = price;
        }
        Ok(Self { prices: table })
    }

    /// USD price of one whole unit of `symbol`.
    pub fn price(&self, symbol: TokenSymbol) -> Decimal {
        self.prices[Self::index(symbol)]
    }

    /// Iterate `(symbol, price)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenSymbol, Decimal)> + '_ {
        TokenSymbol::ALL.into_iter().map(|s| (s, self.price(s)))
    }

    fn index(symbol: TokenSymbol) -> usize {
        match symbol {
            TokenSymbol::ETH => 0,
            TokenSymbol::WETH => 1,
            TokenSymbol::DAI => 2,
            TokenSymbol::USDC => 3,
        }
    }
}

impl Default for PriceTable {
    /// ETH/WETH = $3000, DAI/USDC = $1.
    fn default() -> Self {
        Self {
            prices: [dec!(3000), dec!(3000), dec!(1), dec!(1)],
        }
    }
}

/// Pure quote source over a static `PriceTable`.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPriceSource {
    table: PriceTable,
}

impl SimulatedPriceSource {
    pub fn new(table: PriceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    /// `amount_in * price(from) / price(to)`.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing on absurd inputs.
    pub fn simulate(&self, from: TokenSymbol, to: TokenSymbol, amount_in: Decimal) -> Decimal {
        amount_in
            .checked_mul(self.table.price(from))
            .and_then(|value| value.checked_div(self.table.price(to)))
            .unwrap_or(Decimal::MAX)
    }
}
