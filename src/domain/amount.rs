//! Amount parsing and display.
//!
//! User-entered amounts arrive as free text from the dashboard input.
//! They are parsed into `Decimal` (never `f64`) so repeated formatting
//! and balance arithmetic never drift. Conversion to and from integer
//! base units (wei) happens only at the chain boundary.

use std::str::FromStr;

use alloy::primitives::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

/// Largest amount a single swap may move.
pub const MAX_SWAP_AMOUNT: Decimal = dec!(1000000);

/// Parse a user-entered amount.
///
/// Accepts plain decimals (`"1.5"`) and scientific notation (`"1e3"`).
/// Returns `None` for empty or non-numeric input. Sign is preserved;
/// callers decide whether zero or negative values are acceptable.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Parse an amount and keep it only when strictly positive.
pub fn parse_positive_amount(text: &str) -> Option<Decimal> {
    parse_amount(text).filter(|amount| *amount > Decimal::ZERO)
}

/// Render an amount with four fractional digits (`5` → `"5.0000"`).
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.4}", amount)
}

/// Whole units → integer base units, truncating sub-unit dust.
///
/// `None` for negative amounts or values beyond `Decimal` range.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Option<U256> {
    if amount.is_sign_negative() {
        return None;
    }
    let scale = Decimal::from_i128_with_scale(10i128.pow(u32::from(decimals)), 0);
    let raw = amount.checked_mul(scale)?.trunc().to_u128()?;
    Some(U256::from(raw))
}

/// Integer base units → whole units.
pub fn from_base_units(raw: U256, decimals: u8) -> Option<Decimal> {
    let raw = i128::try_from(u128::try_from(raw).ok()?).ok()?;
    Decimal::try_from_i128_with_scale(raw, u32::from(decimals))
        .ok()
        .map(|d| d.normalize())
}
