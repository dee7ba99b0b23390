//! Common numeric helpers shared by the estimate stages.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a value to whole currency units using half-up rounding.
///
/// Only the result record is rounded; stages pass exact values to each
/// other so rounding error cannot compound.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_whole_units;
///
/// assert_eq!(round_whole_units(dec!(12597.49)), dec!(12597));
/// assert_eq!(round_whole_units(dec!(12597.50)), dec!(12598));
/// assert_eq!(round_whole_units(dec!(-303.5)), dec!(-304)); // Away from zero
/// ```
pub fn round_whole_units(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps negative values to zero.
///
/// Used wherever a "room remaining" quantity may go negative once income
/// already exceeds a threshold.
pub fn clamp_zero(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}
