//! Quote Engine - Debounced, Versioned Price Quotes
//!
//! Turns trade-form edits into quotes:
//! - Every edit issues a new `RequestId` (monotonic counter)
//! - The outbound request waits out the debounce window first; if a
//!   newer edit arrived meanwhile it is dropped without touching the oracle
//! - Live router quote first, simulated table price on any oracle failure
//! - Only the outcome of the most recent request is ever committed

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::domain::amount::parse_positive_amount;
use crate::domain::pricing::SimulatedPriceSource;
use crate::domain::quote::{Quote, QuoteSource, RequestId};
use crate::domain::session::{SessionMode, SessionState};
use crate::domain::token::TokenSymbol;
use crate::ports::price_oracle::PriceOracle;

/// Result of one quote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOutcome {
  /// A priced quote (live or simulated).
  Ready(Quote),
  /// No quote possible (invalid amount, no provider session);
  /// clears any stored quote when committed.
  Cleared { request_id: RequestId },
  /// A newer request was issued before this one resolved.
  Superseded { request_id: RequestId },
}

impl QuoteOutcome {
  pub fn request_id(&self) -> RequestId {
    match self {
      Self::Ready(quote) => quote.request_id,
      Self::Cleared { request_id } | Self::Superseded { request_id } => *request_id,
    }
  }
}

/// Produces quotes with debounce and stale-result suppression.
pub struct QuoteEngine<O: PriceOracle> {
  /// Live router oracle.
  oracle: Arc<O>,
  /// Static-table fallback.
  simulator: SimulatedPriceSource,
  /// Quiet period before an edit turns into an outbound request.
  debounce: Duration,
  /// Most recently issued request id.
  latest: AtomicU64,
}

impl<O: PriceOracle> QuoteEngine<O> {
  /// Create a new quote engine.
  pub fn new(oracle: Arc<O>, simulator: SimulatedPriceSource, debounce: Duration) -> Self {
    Self {
      oracle,
      simulator,
      debounce,
      latest: AtomicU64::new(0),
    }
  }

  /// The id of the most recently issued request.
  pub fn latest_request(&self) -> RequestId {
    self.latest.load(Ordering::SeqCst)
  }

  /// Issue a request id without pricing anything.
  ///
  /// Every request still in flight becomes stale.
  pub fn invalidate(&self) -> RequestId {
    self.latest.fetch_add(1, Ordering::SeqCst) + 1
  }

  fn is_latest(&self, request_id: RequestId) -> bool {
    self.latest_request() == request_id
  }

  /// Request a quote for `amount_text` of `from` into `to`.
  ///
  /// Issues a new request id immediately, so any request still in flight
  /// becomes stale even when this one clears. A self-pair still quotes
  /// (for display); the swap executor rejects it.
  pub async fn request_quote(
    &self,
    mode: SessionMode,
    from: TokenSymbol,
    to: TokenSymbol,
    amount_text: &str,
  ) -> QuoteOutcome {
    let request_id = self.invalidate();
    self.request_quote_with_id(request_id, mode, from, to, amount_text).await
  }

  /// Resolve a request whose id the caller already drew with
  /// [`invalidate`](Self::invalidate), e.g. while holding the lock that
  /// guards the input being priced.
  #[instrument(skip_all, fields(request_id = request_id, ?mode, %from, %to, amount = %amount_text))]
  pub async fn request_quote_with_id(
    &self,
    request_id: RequestId,
    mode: SessionMode,
    from: TokenSymbol,
    to: TokenSymbol,
    amount_text: &str,
  ) -> QuoteOutcome {
    let Some(amount_in) = parse_positive_amount(amount_text) else {
      debug!(request_id, "Amount not positive, clearing quote");
      return QuoteOutcome::Cleared { request_id };
    };
    if mode == SessionMode::Disconnected {
      debug!(request_id, "No provider session, clearing quote");
      return QuoteOutcome::Cleared { request_id };
    }

    tokio::time::sleep(self.debounce).await;
    if !self.is_latest(request_id) {
      debug!(request_id, "Superseded during debounce");
      return QuoteOutcome::Superseded { request_id };
    }

    let (amount_out, source) = self.price(mode, from, to, amount_in).await;

    // A newer edit may have arrived while the oracle was answering.
    if !self.is_latest(request_id) {
      debug!(request_id, "Superseded while pricing");
      return QuoteOutcome::Superseded { request_id };
    }

    QuoteOutcome::Ready(Quote {
      from,
      to,
      amount_in,
      amount_out,
      source,
      request_id,
      quoted_at: Utc::now(),
    })
  }

  /// Live price first; the static table on any oracle failure.
  ///
  /// Demo sessions never reach the oracle.
  async fn price(
    &self,
    mode: SessionMode,
    from: TokenSymbol,
    to: TokenSymbol,
    amount_in: Decimal,
  ) -> (Decimal, QuoteSource) {
    if mode.is_demo() {
      return (self.simulator.simulate(from, to, amount_in), QuoteSource::Simulated);
    }

    match self.oracle.amount_out(from, to, amount_in).await {
      Ok(amount_out) => (amount_out, QuoteSource::Live),
      Err(e) => {
        warn!(error = %e, "Router quote failed, using simulated price");
        (self.simulator.simulate(from, to, amount_in), QuoteSource::Simulated)
      }
    }
  }

  /// Apply `outcome` to the session if it is still the latest request.
  ///
  /// Returns whether the session changed.
  pub fn commit(&self, state: &mut SessionState, outcome: QuoteOutcome) -> bool {
    if !self.is_latest(outcome.request_id()) {
      debug!(request_id = outcome.request_id(), "Dropping stale quote outcome");
      return false;
    }
    match outcome {
      QuoteOutcome::Ready(quote) => {
        state.quote = Some(quote);
        true
      }
      QuoteOutcome::Cleared { .. } => {
        state.quote = None;
        true
      }
      QuoteOutcome::Superseded { .. } => false,
    }
  }
}
