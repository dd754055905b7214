//! Swap records, the capped swap log, and swap failure taxonomy.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::token::TokenSymbol;

/// Most recent swaps kept in the session log.
pub const SWAP_LOG_CAPACITY: usize = 10;

/// An executed swap (real or simulated). Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub id: Uuid,
    pub from: TokenSymbol,
    pub to: TokenSymbol,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub timestamp: DateTime<Utc>,
    /// On-chain transaction hash; `None` for demo swaps.
    pub tx_reference: Option<String>,
}

impl SwapRecord {
    pub fn new(
        from: TokenSymbol,
        to: TokenSymbol,
        amount_in: Decimal,
        amount_out: Decimal,
        tx_reference: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            amount_in,
            amount_out,
            timestamp: Utc::now(),
            tx_reference,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.tx_reference.is_none()
    }
}

/// Newest-first log of completed swaps, capped at `SWAP_LOG_CAPACITY`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapLog {
    entries: VecDeque<SwapRecord>,
}

impl SwapLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at index 0, evicting the oldest entry beyond capacity.
    pub fn record(&mut self, record: SwapRecord) {
        self.entries.push_front(record);
        self.entries.truncate(SWAP_LOG_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&SwapRecord> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&SwapRecord> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwapRecord> {
        self.entries.iter()
    }
}

/// Why a swap was refused or failed.
///
/// Display strings are user-facing status text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("Please enter a valid amount between 0 and 1,000,000.")]
    InvalidAmount,

    #[error("Cannot swap a token for itself.")]
    SameTokenSwap,

    #[error(
        "Insufficient {token} balance. You have {available:.4} {token} available, \
         short by {shortfall:.4} {token}."
    )]
    InsufficientBalance {
        token: TokenSymbol,
        available: Decimal,
        shortfall: Decimal,
    },

    #[error("No valid quote for this trade yet. Wait for the price to refresh.")]
    NoQuote,

    #[error("Live price unavailable: the shown quote is simulated and cannot be executed on-chain.")]
    QuoteUnavailable,

    #[error("Swapping from {0} requires an 'approve' step. Please swap from ETH.")]
    UnsupportedPath(TokenSymbol),

    #[error("Slippage tolerance {0}% is outside the allowed range.")]
    InvalidSlippage(Decimal),

    #[error("Swap failed: {0}")]
    ExecutionFailed(String),

    #[error("A swap is already in progress.")]
    SwapInProgress,
}
