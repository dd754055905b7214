//! Uniswap V2 Router - Live Quotes via `getAmountsOut`
//!
//! Implements the `PriceOracle` port against the router contract.
//! Whole-unit amounts are converted to base units using the token
//! registry's decimals on the way in and back on the way out.

use alloy::primitives::Address;
use alloy::sol;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::domain::amount::{from_base_units, to_base_units};
use crate::domain::token::TokenSymbol;
use crate::ports::price_oracle::{OracleError, PriceOracle};

use super::provider::SepoliaProvider;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract UniswapV2Router02 {
        function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) payable returns (uint256[] memory amounts);
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
    }
}

/// Live price oracle backed by the router's `getAmountsOut`.
pub struct RouterOracle {
    provider: SepoliaProvider,
    router: Address,
}

impl RouterOracle {
    pub fn new(provider: SepoliaProvider, router: Address) -> Self {
        Self { provider, router }
    }
}

/// Two-hop router path; the native token routes through its wrapped form.
pub fn router_path(from: TokenSymbol, to: TokenSymbol) -> Result<Vec<Address>, OracleError> {
    let (a, b) = (from.path_address(), to.path_address());
    if a == b {
        return Err(OracleError::MalformedPath(format!("{from} -> {to}")));
    }
    Ok(vec![a, b])
}

fn classify(err: &alloy::contract::Error) -> OracleError {
    match err {
        alloy::contract::Error::TransportError(rpc) if rpc.as_error_resp().is_some() => {
            OracleError::Reverted(err.to_string())
        }
        alloy::contract::Error::TransportError(_) => OracleError::Unavailable(err.to_string()),
        _ => OracleError::Reverted(err.to_string()),
    }
}

#[async_trait]
impl PriceOracle for RouterOracle {
    #[instrument(skip(self), fields(router = %self.router))]
    async fn amount_out(
        &self,
        from: TokenSymbol,
        to: TokenSymbol,
        amount_in: Decimal,
    ) -> Result<Decimal, OracleError> {
        let path = router_path(from, to)?;
        let raw_in = to_base_units(amount_in, from.token().decimals)
            .ok_or_else(|| OracleError::Conversion(format!("{amount_in} {from}")))?;

        let router = UniswapV2Router02::new(self.router, self.provider.inner());
        let amounts = router
            .getAmountsOut(raw_in, path)
            .call()
            .await
            .map_err(|e| classify(&e))?
            .amounts;

        let raw_out = amounts
            .last()
            .copied()
            .ok_or_else(|| OracleError::Reverted("empty amounts".to_string()))?;
        debug!(%raw_in, %raw_out, "Router quote");

        from_base_units(raw_out, to.token().decimals)
            .ok_or_else(|| OracleError::Conversion(format!("{raw_out} base units of {to}")))
    }
}
