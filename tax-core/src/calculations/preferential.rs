//! Tax on long-term gains and qualified dividends.
//!
//! Preferential income is stacked on top of ordinary income: the ordinary part
//! of taxable income fills the preferential schedule first, and only the slice
//! above it is taxed at the preferential rates. A stack that straddles a bound
//! is split across both brackets.

use rust_decimal::Decimal;
use tracing::debug;

use crate::TaxBracket;
use crate::calculations::common::floor_at_zero;

/// Computes tax on `long_term_gains + qualified_dividends` stacked on top of
/// the ordinary portion of `taxable_income`.
///
/// The preferential amount is clipped to `taxable_income`, so deductions in
/// excess of ordinary income reduce the preferential stack rather than
/// pushing it below zero.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::TaxBracket;
/// use tax_core::calculations::preferential_tax;
///
/// let brackets = vec![
///     TaxBracket::new(dec!(47025), dec!(0.00)),
///     TaxBracket::new(dec!(518900), dec!(0.15)),
///     TaxBracket::unbounded(dec!(0.20)),
/// ];
///
/// // All $60,000 of taxable income is long-term gain.
/// let tax = preferential_tax(dec!(60000), dec!(0), dec!(60000), &brackets);
///
/// assert_eq!(tax, dec!(1946.25));
/// ```
pub fn preferential_tax(
    long_term_gains: Decimal,
    qualified_dividends: Decimal,
    taxable_income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    let preferential_total = long_term_gains + qualified_dividends;
    if preferential_total <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let stack_top = floor_at_zero(taxable_income);
    let stacked = preferential_total.min(stack_top);
    let ordinary_floor = stack_top - stacked;
    debug!(
        preferential_total = %preferential_total,
        stacked = %stacked,
        ordinary_floor = %ordinary_floor,
        "stacking preferential income"
    );

    let mut tax = Decimal::ZERO;
    let mut previous_bound = Decimal::ZERO;

    for bracket in brackets {
        let start = ordinary_floor.max(previous_bound);
        let end = bracket.upper_bound.map_or(stack_top, |bound| stack_top.min(bound));

        if end > start {
            tax += (end - start) * bracket.rate;
        }

        match bracket.upper_bound {
            Some(bound) if bound < stack_top => previous_bound = bound,
            _ => break,
        }
    }

    tax
}
