//! Portfolio valuation and diversity classification.
//!
//! Derived data only: recomputed from the balance snapshot and the
//! static price table whenever balances change, never stored on its own.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::balances::BalanceSnapshot;
use super::pricing::PriceTable;
use super::token::TokenSymbol;

/// Coarse measure of how many distinct tokens hold value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiversityClass {
    Low,
    Medium,
    High,
}

impl DiversityClass {
    /// `<= 1` held token → Low, `2` → Medium, `>= 3` → High.
    pub fn from_held_count(held: usize) -> Self {
        match held {
            0 | 1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }
}

impl fmt::Display for DiversityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// USD valuation of a balance snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    pub total_value: Decimal,
    pub per_token_value: BTreeMap<TokenSymbol, Decimal>,
    /// Share of `total_value`, one decimal place.
    pub per_token_percentage: BTreeMap<TokenSymbol, Decimal>,
    pub diversity: DiversityClass,
}

impl Valuation {
    /// Registered token with the largest USD value, if any value is held.
    pub fn largest_holding(&self) -> Option<(TokenSymbol, Decimal)> {
        self.per_token_value
            .iter()
            .filter(|(_, value)| **value > Decimal::ZERO)
            .max_by(|a, b| a.1.cmp(b.1))
            .map(|(symbol, value)| (*symbol, *value))
    }
}

/// Value every registered token in `balances` at `prices`.
pub fn valuate(balances: &BalanceSnapshot, prices: &PriceTable) -> Valuation {
    let per_token_value: BTreeMap<TokenSymbol, Decimal> = TokenSymbol::ALL
        .into_iter()
        .map(|symbol| (symbol, balances.get(symbol) * prices.price(symbol)))
        .collect();

    let total_value: Decimal = per_token_value.values().copied().sum();

    let per_token_percentage = per_token_value
        .iter()
        .map(|(symbol, value)| {
            let pct = if total_value.is_zero() {
                Decimal::ZERO
            } else {
                (*value / total_value * dec!(100))
                    .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            };
            (*symbol, pct)
        })
        .collect();

    let held = TokenSymbol::ALL
        .into_iter()
        .filter(|symbol| balances.get(*symbol) > Decimal::ZERO)
        .count();

    Valuation {
        total_value,
        per_token_value,
        per_token_percentage,
        diversity: DiversityClass::from_held_count(held),
    }
}
