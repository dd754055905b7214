//! Swap Executor - Validated Swap Execution
//!
//! Checks preconditions in a fixed order, then executes:
//! - Demo: simulated latency, local balance mutation
//! - Connected: `swapExactETHForTokens` through the external signer,
//!   only on live quotes and only from the native token
//!
//! Validation and settlement work on the session; execution does not, so
//! the caller can release the session lock while a swap is confirming.
//! A failed precondition aborts before anything is mutated. Swaps are
//! never retried automatically.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use rust_decimal::Decimal;
use tracing::{error, info, instrument};

use crate::config::AppConfig;
use crate::domain::amount::{MAX_SWAP_AMOUNT, parse_amount, to_base_units};
use crate::domain::quote::Quote;
use crate::domain::session::{SessionMode, SessionState};
use crate::domain::slippage::SlippageTolerance;
use crate::domain::swap::{SwapError, SwapRecord};
use crate::domain::token::TokenSymbol;
use crate::ports::signer::{SwapCall, SwapSigner};

/// Execution policy, resolved from configuration once.
#[derive(Debug, Clone)]
pub struct SwapPolicy {
  /// Router contract the swap call targets.
  pub router: Address,
  /// How long a submitted swap stays executable on-chain.
  pub deadline: chrono::Duration,
  /// Simulated confirmation time for demo swaps.
  pub demo_latency: Duration,
  /// Largest slippage tolerance accepted (percent).
  pub max_slippage_percent: Decimal,
}

impl SwapPolicy {
  pub fn from_config(config: &AppConfig) -> Self {
    Self {
      router: config.chain.router_address,
      deadline: chrono::Duration::minutes(config.chain.deadline_minutes),
      demo_latency: Duration::from_millis(config.swap.demo_latency_ms),
      max_slippage_percent: config.swap.max_slippage_percent,
    }
  }
}

/// A swap that passed every precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSwap {
  pub from: TokenSymbol,
  pub to: TokenSymbol,
  pub amount_in: Decimal,
  /// The quote pricing exactly this triple.
  pub quote: Quote,
  pub tolerance: SlippageTolerance,
  /// Session generation the swap was validated against.
  pub generation: u64,
}

impl ValidatedSwap {
  /// Slippage-adjusted output floor in whole units.
  pub fn min_amount_out(&self) -> Decimal {
    self.tolerance.min_amount_out(self.quote.amount_out)
  }
}

/// Check the session's trade input, first failure wins.
///
/// Order: amount, self-pair, balance, quote, slippage.
pub fn validate(
  state: &SessionState,
  max_slippage_percent: Decimal,
) -> Result<ValidatedSwap, SwapError> {
  let input = &state.input;

  let amount_in = parse_amount(&input.amount)
    .filter(|a| *a > Decimal::ZERO && *a <= MAX_SWAP_AMOUNT)
    .ok_or(SwapError::InvalidAmount)?;

  if input.from == input.to {
    return Err(SwapError::SameTokenSwap);
  }

  let available = state.balances.get(input.from);
  if amount_in > available {
    return Err(SwapError::InsufficientBalance {
      token: input.from,
      available,
      shortfall: amount_in - available,
    });
  }

  let quote = state.current_quote().cloned().ok_or(SwapError::NoQuote)?;

  let slippage = input.slippage_percent;
  let tolerance = SlippageTolerance::from_percent(slippage)
    .filter(|_| slippage <= max_slippage_percent)
    .ok_or(SwapError::InvalidSlippage(slippage))?;

  Ok(ValidatedSwap {
    from: input.from,
    to: input.to,
    amount_in,
    quote,
    tolerance,
    generation: state.generation,
  })
}

/// Apply a completed swap to the session and log it.
///
/// Demo balances move only while the session is still the one the swap
/// was validated against. Real swaps leave balances to a chain re-fetch.
pub fn settle(state: &mut SessionState, swap: &ValidatedSwap, record: &SwapRecord) {
  if record.is_simulated() && state.generation == swap.generation {
    state.balances.debit(record.from, record.amount_in);
    state.balances.credit(record.to, record.amount_out);
  }

  state.swap_log.record(record.clone());
  info!(
    id = %record.id,
    from = %record.from,
    to = %record.to,
    amount_in = %record.amount_in,
    amount_out = %record.amount_out,
    tx = ?record.tx_reference,
    "Swap completed"
  );
}

/// Executes validated swaps.
pub struct SwapExecutor<S: SwapSigner> {
  /// External signer for real swaps.
  signer: Arc<S>,
  policy: SwapPolicy,
}

impl<S: SwapSigner> SwapExecutor<S> {
  /// Create a new swap executor.
  pub fn new(signer: Arc<S>, policy: SwapPolicy) -> Self {
    Self { signer, policy }
  }

  pub fn policy(&self) -> &SwapPolicy {
    &self.policy
  }

  /// Validate the session's current trade against this policy.
  pub fn prepare(&self, state: &SessionState) -> Result<ValidatedSwap, SwapError> {
    validate(state, self.policy.max_slippage_percent)
  }

  /// Run a validated swap in `mode` without touching the session.
  ///
  /// Demo swaps wait out the simulated latency; real swaps wait for the
  /// signer's receipt.
  #[instrument(skip_all, fields(?mode, from = %swap.from, to = %swap.to, amount_in = %swap.amount_in))]
  pub async fn execute(
    &self,
    mode: SessionMode,
    swap: &ValidatedSwap,
  ) -> Result<SwapRecord, SwapError> {
    match mode {
      SessionMode::Demo => {
        tokio::time::sleep(self.policy.demo_latency).await;
        Ok(SwapRecord::new(swap.from, swap.to, swap.amount_in, swap.quote.amount_out, None))
      }
      SessionMode::Connected(account) => self.execute_onchain(account, swap).await,
      SessionMode::Disconnected => {
        Err(SwapError::ExecutionFailed("wallet not connected".to_string()))
      }
    }
  }

  async fn execute_onchain(
    &self,
    account: Address,
    swap: &ValidatedSwap,
  ) -> Result<SwapRecord, SwapError> {
    if !swap.quote.is_live() {
      return Err(SwapError::QuoteUnavailable);
    }
    if !swap.from.is_native() {
      return Err(SwapError::UnsupportedPath(swap.from));
    }

    let call = self.build_call(account, swap)?;
    info!(
      value = %call.value,
      min_amount_out = %call.min_amount_out,
      deadline = %call.deadline,
      "Submitting swapExactETHForTokens"
    );

    match self.signer.sign_and_send(&call).await {
      Ok(tx) => Ok(SwapRecord::new(
        swap.from,
        swap.to,
        swap.amount_in,
        swap.quote.amount_out,
        Some(tx.hash),
      )),
      Err(e) => {
        error!(error = %format!("{e:#}"), "Swap transaction failed");
        Err(SwapError::ExecutionFailed(failure_reason(&e)))
      }
    }
  }

  /// Router call for a native-in swap; the floor is computed on base units.
  fn build_call(&self, account: Address, swap: &ValidatedSwap) -> Result<SwapCall, SwapError> {
    let out_of_range = || SwapError::ExecutionFailed("amount out of range".to_string());

    let value = to_base_units(swap.amount_in, swap.from.token().decimals).ok_or_else(out_of_range)?;
    let quoted_out =
      to_base_units(swap.quote.amount_out, swap.to.token().decimals).ok_or_else(out_of_range)?;

    Ok(SwapCall {
      router: self.policy.router,
      value,
      min_amount_out: swap.tolerance.min_amount_out_base(quoted_out),
      path: [swap.from.path_address(), swap.to.path_address()],
      recipient: account,
      deadline: chrono::Utc::now() + self.policy.deadline,
    })
  }
}

/// User-facing reason for a signer failure, context chain included.
fn failure_reason(e: &anyhow::Error) -> String {
  let reason = format!("{e:#}");
  if reason.trim().is_empty() {
    "Check logs.".to_string()
  } else {
    reason
  }
}
