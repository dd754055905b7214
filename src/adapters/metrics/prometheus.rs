//! Prometheus Metrics Registry - Dashboard Observability
//!
//! Registers and exposes Prometheus metrics for Grafana dashboards.
//! Covers quote provenance, oracle fallbacks, swap outcomes and
//! latency, assistant usage, and the session's portfolio value.

use std::time::Duration;

use prometheus::{
    Encoder, Gauge, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::session::SessionMode;
use crate::domain::swap::{SwapError, SwapRecord};
use crate::usecases::advisor::AdvisorError;
use crate::usecases::quote_engine::QuoteOutcome;

/// Centralized Prometheus metrics for the swap engine.
///
/// All metrics follow the naming convention `aya_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Committed-or-not quotes by source (live, simulated).
    pub quotes: IntCounterVec,
    /// Live quotes that fell back to the price table.
    pub oracle_fallbacks: IntCounter,
    /// Quote requests dropped in favour of a newer edit.
    pub quotes_superseded: IntCounter,
    /// Swaps by session mode and outcome.
    pub swaps: IntCounterVec,
    /// Swap execution latency (seconds).
    pub swap_latency: HistogramVec,
    /// Assistant requests by outcome.
    pub assistant_requests: IntCounterVec,
    /// Session portfolio value in USD.
    pub portfolio_value_usd: Gauge,
}

/// Label for a session mode.
pub fn mode_label(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::Disconnected => "disconnected",
        SessionMode::Connected(_) => "connected",
        SessionMode::Demo => "demo",
    }
}

/// Label for a swap result.
pub fn swap_outcome_label(result: &Result<SwapRecord, SwapError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(SwapError::InvalidAmount) => "invalid_amount",
        Err(SwapError::SameTokenSwap) => "same_token",
        Err(SwapError::InsufficientBalance { .. }) => "insufficient_balance",
        Err(SwapError::NoQuote) => "no_quote",
        Err(SwapError::QuoteUnavailable) => "quote_unavailable",
        Err(SwapError::UnsupportedPath(_)) => "unsupported_path",
        Err(SwapError::InvalidSlippage(_)) => "invalid_slippage",
        Err(SwapError::ExecutionFailed(_)) => "execution_failed",
        Err(SwapError::SwapInProgress) => "in_progress",
    }
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let quotes = IntCounterVec::new(
            Opts::new("aya_quotes_total", "Quotes produced by price source"),
            &["source"],
        )?;

        let oracle_fallbacks = IntCounter::new(
            "aya_oracle_fallbacks_total",
            "Connected-session quotes served from the static price table",
        )?;

        let quotes_superseded = IntCounter::new(
            "aya_quotes_superseded_total",
            "Quote requests dropped because a newer edit arrived",
        )?;

        let swaps = IntCounterVec::new(
            Opts::new("aya_swaps_total", "Swap attempts by mode and outcome"),
            &["mode", "outcome"],
        )?;

        let swap_latency = HistogramVec::new(
            HistogramOpts::new("aya_swap_latency_seconds", "Swap execution latency")
                .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 15.0, 30.0, 60.0]),
            &["mode"],
        )?;

        let assistant_requests = IntCounterVec::new(
            Opts::new("aya_assistant_requests_total", "Assistant requests by outcome"),
            &["outcome"],
        )?;

        let portfolio_value_usd = Gauge::new(
            "aya_portfolio_value_usd",
            "Session portfolio value at static prices",
        )?;

        registry.register(Box::new(quotes.clone()))?;
        registry.register(Box::new(oracle_fallbacks.clone()))?;
        registry.register(Box::new(quotes_superseded.clone()))?;
        registry.register(Box::new(swaps.clone()))?;
        registry.register(Box::new(swap_latency.clone()))?;
        registry.register(Box::new(assistant_requests.clone()))?;
        registry.register(Box::new(portfolio_value_usd.clone()))?;

        Ok(Self {
            registry,
            quotes,
            oracle_fallbacks,
            quotes_superseded,
            swaps,
            swap_latency,
            assistant_requests,
            portfolio_value_usd,
        })
    }

    /// Count a quote outcome produced in `mode`.
    pub fn record_quote(&self, mode: SessionMode, outcome: &QuoteOutcome) {
        match outcome {
            QuoteOutcome::Ready(quote) => {
                let source = quote.source.to_string();
                self.quotes.with_label_values(&[source.as_str()]).inc();
                if !quote.is_live() && matches!(mode, SessionMode::Connected(_)) {
                    self.oracle_fallbacks.inc();
                }
            }
            QuoteOutcome::Superseded { .. } => self.quotes_superseded.inc(),
            QuoteOutcome::Cleared { .. } => {}
        }
    }

    /// Count a swap attempt and its latency.
    pub fn record_swap(
        &self,
        mode: SessionMode,
        result: &Result<SwapRecord, SwapError>,
        elapsed: Duration,
    ) {
        let mode = mode_label(mode);
        self.swaps
            .with_label_values(&[mode, swap_outcome_label(result)])
            .inc();
        if result.is_ok() {
            self.swap_latency
                .with_label_values(&[mode])
                .observe(elapsed.as_secs_f64());
        }
    }

    pub fn record_assistant(&self, result: &Result<String, AdvisorError>) {
        let outcome = match result {
            Ok(_) => "answered",
            Err(AdvisorError::PortfolioUnavailable) => "no_portfolio",
            Err(AdvisorError::EmptyQuestion) => "empty_question",
            Err(AdvisorError::RateLimited) => "rate_limited",
            Err(AdvisorError::GenerationFailed(_)) => "failed",
        };
        self.assistant_requests.with_label_values(&[outcome]).inc();
    }

    pub fn set_portfolio_value(&self, value: Decimal) {
        self.portfolio_value_usd.set(value.to_f64().unwrap_or(0.0));
    }

    /// Text exposition of every registered metric.
    pub fn encode(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
