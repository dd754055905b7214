//! Dashboard Session - Single Owner of Session State
//!
//! Wires the quote engine, swap executor, wallet manager and advisor
//! around one `SessionState` behind an async mutex:
//! - Quote request ids are drawn under the lock, in input-write order
//! - Quote resolution runs without the lock; the commit re-acquires it
//! - A swap validates and settles under the lock but confirms without
//!   it; an in-flight flag refuses a second concurrent swap
//! - Status messages mirror swap outcomes for the UI

use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::domain::balances::BalanceSnapshot;
use crate::domain::pricing::{PriceTable, SimulatedPriceSource};
use crate::domain::quote::{Quote, RequestId};
use crate::domain::session::{SessionMode, SessionState, StatusMessage, TradeInput};
use crate::domain::swap::{SwapError, SwapRecord};
use crate::domain::valuation::Valuation;
use crate::ports::balance_source::BalanceSource;
use crate::ports::price_oracle::PriceOracle;
use crate::ports::signer::SwapSigner;
use crate::ports::text_generator::TextGenerator;
use crate::usecases::advisor::{AdvisorError, PortfolioAdvisor};
use crate::usecases::quote_engine::{QuoteEngine, QuoteOutcome};
use crate::usecases::swap_executor::{SwapExecutor, SwapPolicy, settle};
use crate::usecases::wallet_manager::WalletManager;

/// Serializable view of the session for the UI.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
  pub mode: SessionMode,
  pub balances: BalanceSnapshot,
  pub input: TradeInput,
  /// Only a quote that still prices the current input.
  pub quote: Option<Quote>,
  pub valuation: Valuation,
  /// Newest first.
  pub swap_log: Vec<SwapRecord>,
  pub status: Option<StatusMessage>,
  /// A swap is waiting for confirmation.
  pub swap_pending: bool,
}

/// Marks a swap as in flight; cleared on drop, including when the
/// swapping future is cancelled.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
  fn acquire(flag: &'a AtomicBool) -> Option<Self> {
    flag
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| Self(flag))
  }
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

/// The dashboard session service.
pub struct Dashboard<O, S, B, G>
where
  O: PriceOracle,
  S: SwapSigner,
  B: BalanceSource,
  G: TextGenerator,
{
  state: Mutex<SessionState>,
  quotes: QuoteEngine<O>,
  executor: SwapExecutor<S>,
  wallet: WalletManager<B>,
  advisor: PortfolioAdvisor<G>,
  /// Supplies the account on connect.
  signer: Arc<S>,
  prices: PriceTable,
  demo_balances: BalanceSnapshot,
  swap_in_flight: AtomicBool,
}

impl<O, S, B, G> Dashboard<O, S, B, G>
where
  O: PriceOracle,
  S: SwapSigner,
  B: BalanceSource,
  G: TextGenerator,
{
  /// Build the session service from configuration and port adapters.
  pub fn new(
    config: &AppConfig,
    oracle: Arc<O>,
    signer: Arc<S>,
    balances: Arc<B>,
    generator: Arc<G>,
  ) -> Result<Self> {
    let prices = config.price_table().context("Invalid price table")?;
    let per_minute = NonZeroU32::new(config.ai.max_requests_per_minute)
      .context("ai.max_requests_per_minute must be > 0")?;

    Ok(Self {
      state: Mutex::new(SessionState::new()),
      quotes: QuoteEngine::new(
        oracle,
        SimulatedPriceSource::new(prices.clone()),
        Duration::from_millis(config.quote.debounce_ms),
      ),
      executor: SwapExecutor::new(Arc::clone(&signer), SwapPolicy::from_config(config)),
      wallet: WalletManager::new(balances),
      advisor: PortfolioAdvisor::new(generator, prices.clone(), per_minute),
      signer,
      prices,
      demo_balances: config.demo_balances(),
      swap_in_flight: AtomicBool::new(false),
    })
  }

  /// Connect the signer's account and load its balances.
  #[instrument(skip(self))]
  pub async fn connect(&self) -> Result<Address> {
    let account = self
      .signer
      .address()
      .await
      .context("Failed to get account from signer")?;
    let balances = self.wallet.refresh(account).await;

    {
      let mut state = self.state.lock().await;
      state.switch_mode(SessionMode::Connected(account), balances);
      state.status = Some(StatusMessage::info("Wallet connected."));
    }
    info!(%account, "Wallet connected");

    self.refresh_quote().await;
    Ok(account)
  }

  /// Start a simulated session with the configured demo balances.
  #[instrument(skip(self))]
  pub async fn enter_demo(&self) {
    {
      let mut state = self.state.lock().await;
      state.switch_mode(SessionMode::Demo, self.demo_balances.clone());
      state.status = Some(StatusMessage::info(
        "Demo mode activated. Swaps are simulated.",
      ));
    }
    info!("Demo mode activated");

    self.refresh_quote().await;
  }

  /// Drop the session's account and balances. The swap log survives.
  #[instrument(skip(self))]
  pub async fn disconnect(&self) {
    self.quotes.invalidate();
    let mut state = self.state.lock().await;
    state.switch_mode(SessionMode::Disconnected, BalanceSnapshot::new());
    state.status = Some(StatusMessage::info("Wallet disconnected."));
    info!("Session disconnected");
  }

  /// Replace the trade form and resolve a debounced quote for it.
  ///
  /// The returned outcome is `Superseded` when a later edit won.
  pub async fn set_input(&self, input: TradeInput) -> QuoteOutcome {
    let (request_id, mode) = {
      let mut state = self.state.lock().await;
      state.input = input.clone();
      state.invalidate_stale_quote();
      (self.quotes.invalidate(), state.mode)
    };
    self.resolve(request_id, mode, input).await
  }

  /// Re-quote the current input (after a mode switch).
  pub async fn refresh_quote(&self) -> QuoteOutcome {
    let (request_id, mode, input) = {
      let state = self.state.lock().await;
      (self.quotes.invalidate(), state.mode, state.input.clone())
    };
    self.resolve(request_id, mode, input).await
  }

  async fn resolve(&self, request_id: RequestId, mode: SessionMode, input: TradeInput) -> QuoteOutcome {
    let outcome = self
      .quotes
      .request_quote_with_id(request_id, mode, input.from, input.to, &input.amount)
      .await;

    let mut state = self.state.lock().await;
    // The mode may have switched while pricing.
    if state.mode == mode {
      self.quotes.commit(&mut state, outcome.clone());
    }
    outcome
  }

  /// Execute the current trade.
  ///
  /// The session lock is held only to validate and to settle, so the UI
  /// keeps reading state while a swap confirms. Clears the amount after
  /// an execution attempt. A real swap re-fetches balances on success.
  #[instrument(skip(self))]
  pub async fn swap(&self) -> Result<SwapRecord, SwapError> {
    let prepared = {
      let mut state = self.state.lock().await;
      let prepared = match InFlight::acquire(&self.swap_in_flight) {
        None => Err(SwapError::SwapInProgress),
        Some(guard) => self
          .executor
          .prepare(&state)
          .map(|swap| (state.mode, swap, guard)),
      };
      if let Err(e) = &prepared {
        state.status = Some(StatusMessage::error(e.to_string()));
      }
      prepared
    };
    let (mode, swap, _in_flight) = prepared?;

    let result = self.executor.execute(mode, &swap).await;

    let refresh = {
      let mut state = self.state.lock().await;
      match &result {
        Ok(record) => {
          settle(&mut state, &swap, record);
          state.status = Some(StatusMessage::success("Swap successful!"));
          self.reset_amount(&mut state);
          state
            .mode
            .account()
            .filter(|_| !record.is_simulated() && state.generation == swap.generation)
            .map(|account| (account, state.generation))
        }
        Err(e) => {
          state.status = Some(StatusMessage::error(e.to_string()));
          if matches!(
            e,
            SwapError::ExecutionFailed(_) | SwapError::QuoteUnavailable | SwapError::UnsupportedPath(_)
          ) {
            self.reset_amount(&mut state);
          }
          None
        }
      }
    };

    if let Some((account, generation)) = refresh {
      let balances = self.wallet.refresh(account).await;
      let mut state = self.state.lock().await;
      if state.generation == generation {
        state.balances = balances;
      }
    }
    result
  }

  fn reset_amount(&self, state: &mut SessionState) {
    self.quotes.invalidate();
    state.input.amount.clear();
    state.quote = None;
  }

  /// Ask the assistant about the current portfolio.
  ///
  /// `None` requests a general review.
  pub async fn ask(&self, question: Option<&str>) -> Result<String, AdvisorError> {
    let balances = self.state.lock().await.balances.clone();
    match question {
      Some(text) => self.advisor.ask(&balances, text).await,
      None => self.advisor.analyze(&balances).await,
    }
  }

  /// The most recently issued quote request.
  pub fn latest_request(&self) -> RequestId {
    self.quotes.latest_request()
  }

  /// Serializable view of the whole session.
  pub async fn snapshot(&self) -> DashboardView {
    let state = self.state.lock().await;
    DashboardView {
      mode: state.mode,
      balances: state.balances.clone(),
      input: state.input.clone(),
      quote: state.current_quote().cloned(),
      valuation: state.valuation(&self.prices),
      swap_log: state.swap_log.iter().cloned().collect(),
      status: state.status.clone(),
      swap_pending: self.swap_in_flight.load(Ordering::Acquire),
    }
  }
}
