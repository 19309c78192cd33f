//! Monetary normalization helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` values normalized to exactly two
//! fractional digits with half-up rounding (ties round away from zero).

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits every stored monetary value carries.
pub const MONEY_SCALE: u32 = 2;

/// Normalizes a monetary amount to exactly 2 fractional digits, half-up.
///
/// `12.005` becomes `12.01`, `12.004` becomes `12.00`. Negative amounts
/// round their ties away from zero as well (`-12.005` becomes `-12.01`).
/// Normalization is idempotent.
#[must_use]
pub fn normalize(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // round_dp leaves the scale untouched when it is already <= 2; amounts
    // must round-trip at exactly 2 fractional digits.
    rounded.rescale(MONEY_SCALE);
    rounded
}
