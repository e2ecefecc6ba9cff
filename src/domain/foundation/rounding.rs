//! Currency rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a currency amount to 2 decimal places, half away from zero.
///
/// Every monetary figure leaving an engine has passed through this
/// function; comparisons against statutory thresholds happen on the raw
/// pre-rounding value.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
