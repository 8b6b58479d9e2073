//! Progressive marginal-rate evaluation.
//!
//! A schedule is an ascending list of [`TaxBracket`]s. The first bracket
//! covers `0..=upper_bound`, each following bracket starts at the previous
//! bound, and the last one is unbounded. An amount sitting exactly on a bound
//! is taxed entirely in the lower bracket.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::TaxBracket;

/// Tax owed on an amount together with the rate of its top slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub tax: Decimal,
    /// Rate of the highest bracket that received a positive slice, or the
    /// first bracket's rate when nothing was taxed.
    pub marginal_rate: Decimal,
}

/// Evaluates `amount` against a progressive schedule.
///
/// Zero and negative amounts owe nothing. An empty schedule owes nothing at a
/// zero marginal rate; validated tables never contain one.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::TaxBracket;
/// use tax_core::calculations::progressive_tax;
///
/// let brackets = vec![
///     TaxBracket::new(dec!(11600), dec!(0.10)),
///     TaxBracket::new(dec!(47150), dec!(0.12)),
///     TaxBracket::unbounded(dec!(0.22)),
/// ];
///
/// let result = progressive_tax(dec!(50000), &brackets);
///
/// // 1,160 + 4,266 + 627
/// assert_eq!(result.tax, dec!(6053));
/// assert_eq!(result.marginal_rate, dec!(0.22));
/// ```
pub fn progressive_tax(
    amount: Decimal,
    brackets: &[TaxBracket],
) -> BracketTax {
    let mut tax = Decimal::ZERO;
    let mut marginal_rate = brackets.first().map_or(Decimal::ZERO, |b| b.rate);
    let mut floor = Decimal::ZERO;

    for bracket in brackets {
        if amount <= floor {
            break;
        }

        let ceiling = bracket.upper_bound.map_or(amount, |bound| amount.min(bound));
        tax += (ceiling - floor) * bracket.rate;
        marginal_rate = bracket.rate;

        match bracket.upper_bound {
            Some(bound) => floor = bound,
            None => break,
        }
    }

    BracketTax { tax, marginal_rate }
}
