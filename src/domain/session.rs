//! Session state: mode, balances, trade input, current quote, swap log.
//!
//! One `SessionState` exists per dashboard session. Components receive
//! it by reference; only the swap executor and the balance refresh write
//! balances and the swap log.

use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount::parse_positive_amount;
use super::balances::BalanceSnapshot;
use super::pricing::PriceTable;
use super::quote::Quote;
use super::slippage::SlippageTolerance;
use super::swap::SwapLog;
use super::token::TokenSymbol;
use super::valuation::{Valuation, valuate};

/// Which kind of session is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "account")]
pub enum SessionMode {
    Disconnected,
    /// A real wallet account behind the external signer.
    Connected(Address),
    /// Fully simulated session, no external network calls.
    Demo,
}

impl SessionMode {
    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo)
    }

    pub fn account(&self) -> Option<Address> {
        match self {
            Self::Connected(account) => Some(*account),
            _ => None,
        }
    }
}

/// The trade form as the user currently has it filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInput {
    pub from: TokenSymbol,
    pub to: TokenSymbol,
    /// Raw amount text; parsed on demand.
    pub amount: String,
    pub slippage_percent: Decimal,
}

impl TradeInput {
    /// Parsed amount when it is a positive number.
    pub fn amount_in(&self) -> Option<Decimal> {
        parse_positive_amount(&self.amount)
    }
}

impl Default for TradeInput {
    fn default() -> Self {
        Self {
            from: TokenSymbol::ETH,
            to: TokenSymbol::DAI,
            amount: String::new(),
            slippage_percent: SlippageTolerance::default().percent(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// Human-readable status line shown above the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Error, text: text.into() }
    }
}

/// Everything the session owns.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub mode: SessionMode,
    pub balances: BalanceSnapshot,
    pub input: TradeInput,
    pub quote: Option<Quote>,
    pub swap_log: SwapLog,
    pub status: Option<StatusMessage>,
    /// Bumped on every mode switch; work started under an older
    /// generation must not write balances.
    pub generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            mode: SessionMode::Disconnected,
            balances: BalanceSnapshot::new(),
            input: TradeInput::default(),
            quote: None,
            swap_log: SwapLog::new(),
            status: None,
            generation: 0,
        }
    }

    /// Switch modes: balances replaced, quote dropped, swap log kept.
    pub fn switch_mode(&mut self, mode: SessionMode, balances: BalanceSnapshot) {
        self.mode = mode;
        self.balances = balances;
        self.quote = None;
        self.generation += 1;
    }

    /// The quote, only while it still prices the current input.
    pub fn current_quote(&self) -> Option<&Quote> {
        let amount = self.input.amount_in()?;
        self.quote
            .as_ref()
            .filter(|q| q.matches(self.input.from, self.input.to, amount))
    }

    /// Drop the stored quote if the input no longer matches it.
    pub fn invalidate_stale_quote(&mut self) {
        if self.current_quote().is_none() {
            self.quote = None;
        }
    }

    pub fn valuation(&self, prices: &PriceTable) -> Valuation {
        valuate(&self.balances, prices)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
