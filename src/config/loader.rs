//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    name = %config.app.name,
    chain_id = config.chain.chain_id,
    router = %config.chain.router_address,
    debounce_ms = config.quote.debounce_ms,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty endpoints
/// - A total, positive price table
/// - Sensible slippage and timing bounds
/// - Non-negative demo balances
fn validate_config(config: &AppConfig) -> Result<()> {
  // Chain validation
  anyhow::ensure!(
    !config.chain.rpc_url.is_empty(),
    "Chain rpc_url must not be empty"
  );
  anyhow::ensure!(
    config.chain.deadline_minutes > 0,
    "deadline_minutes must be positive, got {}",
    config.chain.deadline_minutes
  );

  // Price table must cover every registered token
  config
    .price_table()
    .context("Invalid [prices] table")?;

  // Swap policy validation
  anyhow::ensure!(
    config.swap.max_slippage_percent > Decimal::ZERO
      && config.swap.max_slippage_percent < dec!(100),
    "max_slippage_percent must be in (0, 100), got {}",
    config.swap.max_slippage_percent
  );

  // Demo balances validation
  for (symbol, balance) in &config.demo.balances {
    anyhow::ensure!(
      *balance >= Decimal::ZERO,
      "Demo balance for {} must not be negative, got {}",
      symbol,
      balance
    );
  }

  // AI validation
  anyhow::ensure!(
    config.ai.max_requests_per_minute > 0,
    "ai.max_requests_per_minute must be positive"
  );
  anyhow::ensure!(
    !config.ai.model.is_empty(),
    "ai.model must not be empty"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::token::TokenSymbol;

  const MINIMAL: &str = r#"
[app]
name = "aya-test"

[chain]
rpc_url = "http://127.0.0.1:8545"
"#;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_minimal_config_uses_defaults() {
    let config = parse_config(MINIMAL).unwrap();
    assert_eq!(config.chain.chain_id, 11_155_111);
    assert_eq!(config.chain.deadline_minutes, 15);
    assert_eq!(config.quote.debounce_ms, 500);
    assert_eq!(config.swap.max_slippage_percent, dec!(5));
    assert_eq!(config.app.log_level, "info");
    let prices = config.price_table().unwrap();
    assert_eq!(prices.price(TokenSymbol::ETH), dec!(3000));
    assert_eq!(config.demo_balances().get(TokenSymbol::ETH), dec!(10));
  }

  #[test]
  fn test_price_override() {
    let text = format!(
      "{MINIMAL}\n[prices]\nETH = \"2500\"\nWETH = \"2500\"\nDAI = \"1\"\nUSDC = \"1\"\n"
    );
    let config = parse_config(&text).unwrap();
    assert_eq!(config.price_table().unwrap().price(TokenSymbol::WETH), dec!(2500));
  }

  #[test]
  fn test_incomplete_price_table_rejected() {
    let text = format!("{MINIMAL}\n[prices]\nETH = \"2500\"\n");
    assert!(parse_config(&text).is_err());
  }

  #[test]
  fn test_empty_rpc_rejected() {
    let text = "[app]\nname = \"x\"\n[chain]\nrpc_url = \"\"\n";
    assert!(parse_config(text).is_err());
  }
}
