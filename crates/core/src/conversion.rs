//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for converted amounts:
//! - Always round to a fixed number of decimal places
//! - Use banker's rounding (round half to even)

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Decimal places for converted amounts in API responses.
pub const AMOUNT_DECIMAL_PLACES: u32 = 4;

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    let converted = amount * rate;
    converted.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}
