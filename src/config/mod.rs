//! Configuration Module - TOML-based Engine Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! The router address, chain, price table and demo balances are
//! externalized here; secrets (the text-generation API key) come from
//! environment variables only.

pub mod loader;

use std::collections::BTreeMap;

use alloy::primitives::{Address, address};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::balances::BalanceSnapshot;
use crate::domain::pricing::{PriceTable, PriceTableError};
use crate::domain::token::TokenSymbol;

/// Top-level engine configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the server starts accepting requests.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Process identity and logging.
  pub app: AppSection,
  /// Chain and router settings.
  pub chain: ChainConfig,
  /// Quote engine tuning.
  #[serde(default)]
  pub quote: QuoteConfig,
  /// Swap executor policy.
  #[serde(default)]
  pub swap: SwapConfig,
  /// Static USD price table (symbol -> price).
  #[serde(default = "default_prices")]
  pub prices: BTreeMap<TokenSymbol, Decimal>,
  /// Demo session settings.
  #[serde(default)]
  pub demo: DemoConfig,
  /// Text-generation service.
  #[serde(default)]
  pub ai: AiConfig,
  /// HTTP API server.
  #[serde(default)]
  pub server: ServerConfig,
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable deployment name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Enter demo mode at startup instead of waiting for a connect.
  #[serde(default)]
  pub start_in_demo: bool,
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
  /// JSON-RPC endpoint. The node or wallet behind it signs transactions.
  pub rpc_url: String,
  /// Expected chain ID (Sepolia = 11155111).
  #[serde(default = "default_chain_id")]
  pub chain_id: u64,
  /// Uniswap V2 router contract.
  #[serde(default = "default_router")]
  pub router_address: Address,
  /// Minutes a submitted swap stays executable.
  #[serde(default = "default_deadline_minutes")]
  pub deadline_minutes: i64,
}

/// Quote engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
  /// Debounce window collapsing rapid edits into one request (ms).
  #[serde(default = "default_debounce_ms")]
  pub debounce_ms: u64,
}

/// Swap executor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SwapConfig {
  /// Largest slippage tolerance a user may request (percent).
  #[serde(default = "default_max_slippage")]
  pub max_slippage_percent: Decimal,
  /// Simulated confirmation latency for demo swaps (ms).
  #[serde(default = "default_demo_latency_ms")]
  pub demo_latency_ms: u64,
}

/// Demo session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
  /// Starting balances for a fresh demo session.
  #[serde(default = "default_demo_balances")]
  pub balances: BTreeMap<TokenSymbol, Decimal>,
}

/// Text-generation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
  /// Generative Language API base URL.
  #[serde(default = "default_ai_base_url")]
  pub base_url: String,
  /// Model name.
  #[serde(default = "default_ai_model")]
  pub model: String,
  /// Request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
  /// Maximum assistant requests per minute.
  #[serde(default = "default_ai_rate")]
  pub max_requests_per_minute: u32,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// API + health bind address.
  #[serde(default = "default_bind_addr")]
  pub bind_address: String,
  /// Enable the Prometheus `/metrics` route.
  #[serde(default = "default_true")]
  pub metrics_enabled: bool,
}

impl Default for QuoteConfig {
  fn default() -> Self {
    Self { debounce_ms: default_debounce_ms() }
  }
}

impl Default for SwapConfig {
  fn default() -> Self {
    Self {
      max_slippage_percent: default_max_slippage(),
      demo_latency_ms: default_demo_latency_ms(),
    }
  }
}

impl Default for DemoConfig {
  fn default() -> Self {
    Self { balances: default_demo_balances() }
  }
}

impl Default for AiConfig {
  fn default() -> Self {
    Self {
      base_url: default_ai_base_url(),
      model: default_ai_model(),
      timeout_seconds: default_timeout(),
      max_requests_per_minute: default_ai_rate(),
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_addr(),
      metrics_enabled: true,
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_chain_id() -> u64 {
  11_155_111
}

fn default_router() -> Address {
  address!("c532a74256d3db42d0bf7a0400fefdbad7694008")
}

fn default_deadline_minutes() -> i64 {
  15
}

fn default_debounce_ms() -> u64 {
  500
}

fn default_max_slippage() -> Decimal {
  dec!(5)
}

fn default_demo_latency_ms() -> u64 {
  1500
}

fn default_prices() -> BTreeMap<TokenSymbol, Decimal> {
  BTreeMap::from([
    (TokenSymbol::ETH, dec!(3000)),
    (TokenSymbol::WETH, dec!(3000)),
    (TokenSymbol::DAI, dec!(1)),
    (TokenSymbol::USDC, dec!(1)),
  ])
}

fn default_demo_balances() -> BTreeMap<TokenSymbol, Decimal> {
  BTreeMap::from([
    (TokenSymbol::ETH, dec!(10)),
    (TokenSymbol::WETH, dec!(0)),
    (TokenSymbol::DAI, dec!(1000)),
    (TokenSymbol::USDC, dec!(500)),
  ])
}

fn default_ai_base_url() -> String {
  "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ai_model() -> String {
  "gemini-1.5-flash".to_string()
}

fn default_timeout() -> u64 {
  30
}

fn default_ai_rate() -> u32 {
  10
}

fn default_bind_addr() -> String {
  "0.0.0.0:8080".to_string()
}

impl AppConfig {
  /// Price table built from the `[prices]` section.
  pub fn price_table(&self) -> Result<PriceTable, PriceTableError> {
    PriceTable::new(&self.prices)
  }

  /// Starting balances for a demo session.
  pub fn demo_balances(&self) -> BalanceSnapshot {
    self.demo.balances.iter().map(|(s, b)| (*s, *b)).collect()
  }
}
