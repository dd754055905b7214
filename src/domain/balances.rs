//! Balance snapshot for the active session.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::token::TokenSymbol;

/// Token symbol → whole-unit balance.
///
/// Replaced wholesale on every refresh. The demo swap path is the only
/// place that mutates it in place. Missing entries read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSnapshot {
    balances: BTreeMap<TokenSymbol, Decimal>,
}

impl BalanceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `symbol`, zero when unknown.
    pub fn get(&self, symbol: TokenSymbol) -> Decimal {
        self.balances.get(&symbol).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn set(&mut self, symbol: TokenSymbol, amount: Decimal) {
        self.balances.insert(symbol, amount);
    }

    /// Add `amount` to `symbol`.
    pub fn credit(&mut self, symbol: TokenSymbol, amount: Decimal) {
        let current = self.get(symbol);
        self.balances.insert(symbol, current + amount);
    }

    /// Subtract `amount` from `symbol`. Callers check sufficiency first.
    pub fn debit(&mut self, symbol: TokenSymbol, amount: Decimal) {
        let current = self.get(symbol);
        self.balances.insert(symbol, current - amount);
    }

    /// True when no token has been recorded (nothing fetched yet).
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenSymbol, Decimal)> + '_ {
        self.balances.iter().map(|(s, b)| (*s, *b))
    }
}

impl FromIterator<(TokenSymbol, Decimal)> for BalanceSnapshot {
    fn from_iter<I: IntoIterator<Item = (TokenSymbol, Decimal)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}
