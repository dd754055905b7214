//! Quotes and their provenance.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::token::TokenSymbol;

/// Monotonically increasing quote request sequence number.
pub type RequestId = u64;

/// Where a quote's price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteSource {
    /// Router `getAmountsOut` answered.
    Live,
    /// Static price table (oracle failed, or demo session).
    Simulated,
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Simulated => write!(f, "simulated"),
        }
    }
}

/// A priced estimate for one `(from, to, amount_in)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub from: TokenSymbol,
    pub to: TokenSymbol,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub source: QuoteSource,
    pub request_id: RequestId,
    pub quoted_at: DateTime<Utc>,
}

impl Quote {
    /// Whether this quote was produced for exactly this triple.
    ///
    /// A quote is authoritative only while the input it priced is unchanged.
    pub fn matches(&self, from: TokenSymbol, to: TokenSymbol, amount_in: Decimal) -> bool {
        self.from == from && self.to == to && self.amount_in == amount_in
    }

    pub fn is_live(&self) -> bool {
        self.source == QuoteSource::Live
    }
}
