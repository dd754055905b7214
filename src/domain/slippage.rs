//! Slippage tolerance and minimum-output computation.
//!
//! Tolerance is entered as a percentage and truncated (floor) to whole
//! basis points before use, so the on-chain floor is never lower than the
//! user asked for and the integer base-unit math stays exact.

use alloy::primitives::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

/// Basis points in 100%.
const BPS_DENOMINATOR: u32 = 10_000;

/// Slippage tolerance expressed in percent (0.5 = 0.5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlippageTolerance {
    percent: Decimal,
}

impl SlippageTolerance {
    /// Accepts `0 <= percent < 100`.
    pub fn from_percent(percent: Decimal) -> Option<Self> {
        (percent >= Decimal::ZERO && percent < dec!(100)).then_some(Self { percent })
    }

    pub fn percent(&self) -> Decimal {
        self.percent
    }

    /// `floor(percent * 100)`.
    pub fn basis_points(&self) -> u32 {
        (self.percent * dec!(100))
            .floor()
            .to_u32()
            .unwrap_or(0)
            .min(BPS_DENOMINATOR)
    }

    /// `amount_out - amount_out * bps / 10000` on whole-unit decimals.
    pub fn min_amount_out(&self, amount_out: Decimal) -> Decimal {
        let bps = Decimal::from(self.basis_points());
        amount_out - amount_out * bps / Decimal::from(BPS_DENOMINATOR)
    }

    /// Same formula on integer base units; the deduction truncates.
    pub fn min_amount_out_base(&self, amount_out: U256) -> U256 {
        let bps = U256::from(self.basis_points());
        let deduction = amount_out.saturating_mul(bps) / U256::from(BPS_DENOMINATOR);
        amount_out - deduction
    }
}

impl Default for SlippageTolerance {
    /// 0.5%
    fn default() -> Self {
        Self { percent: dec!(0.5) }
    }
}
