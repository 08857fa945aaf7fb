//! Fixed-scale decimal helpers
//!
//! Fund returns are stored and indexed with exactly four fractional digits.
//! Rounding is half-up (ties away from zero), so `0.00005` becomes `0.0001`
//! and `-0.00005` becomes `-0.0001`.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Number of fractional digits kept for every return metric
pub const RETURN_SCALE: u32 = 4;

/// Integer digits a return may carry; the store column is `NUMERIC(20, 4)`
pub const RETURN_INTEGER_DIGITS: u32 = 16;

/// Rounds a value half-up and pads it to exactly [`RETURN_SCALE`] digits
///
/// # Example
///
/// ```rust
/// use core_kernel::scale_half_up;
/// use rust_decimal_macros::dec;
///
/// let scaled = scale_half_up(dec!(75.71));
/// assert_eq!(scaled.to_string(), "75.7100");
/// ```
pub fn scale_half_up(value: Decimal) -> Decimal {
    let mut scaled =
        value.round_dp_with_strategy(RETURN_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // round_dp never increases the scale; rescale pads trailing zeros.
    scaled.rescale(RETURN_SCALE);
    scaled
}

/// Scales a value and rejects it when it cannot be stored as a return
///
/// `None` when the magnitude reaches `10^16` or when the decimal has too many
/// integer digits to carry four fractional ones.
///
/// ```rust
/// use core_kernel::checked_scale;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(checked_scale(dec!(1.5)), Some(dec!(1.5000)));
/// assert_eq!(checked_scale(dec!(10000000000000000)), None);
/// ```
pub fn checked_scale(value: Decimal) -> Option<Decimal> {
    let scaled = scale_half_up(value);
    if scaled.scale() != RETURN_SCALE {
        return None;
    }
    let limit = Decimal::from(10_i64.pow(RETURN_INTEGER_DIGITS));
    (scaled.abs() < limit).then_some(scaled)
}

/// Parses a dot-decimal string into a [`Decimal`] scaled to [`RETURN_SCALE`]
///
/// Plain (`"1000.50"`, `"-3"`) and scientific (`"1.5E3"`) notations are
/// accepted. Returns `None` when the text is not a number or the value does
/// not fit the store column (see [`checked_scale`]).
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .and_then(checked_scale)
}
