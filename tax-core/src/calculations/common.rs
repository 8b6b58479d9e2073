//! Rounding and clipping helpers shared by the calculators.
//!
//! Calculators keep full precision internally; these helpers are applied only
//! where a value is clipped by an invariant or when the final result is
//! assembled.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, with midpoints rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(7064.775)), dec!(7064.78));
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a fraction to a percentage rounded to `decimal_places`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::to_percent;
///
/// assert_eq!(to_percent(dec!(0.22), 1), dec!(22.0));
/// assert_eq!(to_percent(dec!(0.123456), 2), dec!(12.35));
/// ```
pub fn to_percent(
    fraction: Decimal,
    decimal_places: u32,
) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clips negative values to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-5.00)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(5.00)), dec!(5.00));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}
