//! Estimated-payment schedule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyPayment {
    /// 1 through 4.
    pub quarter: u8,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}

/// (quarter, month, day, year offset)
const DUE_DATES: [(u8, u32, u32, i32); 4] = [(1, 4, 15, 0), (2, 6, 15, 0), (3, 9, 15, 0), (4, 1, 15, 1)];

/// Splits the annual liability into four equal estimated payments due
/// April 15, June 15 and September 15 of the tax year and January 15 of the
/// following year.
///
/// Due dates are not shifted for weekends or holidays.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::quarterly_schedule;
///
/// let schedule = quarterly_schedule(2024, dec!(10000.10));
///
/// assert_eq!(schedule.len(), 4);
/// assert_eq!(schedule[0].amount, dec!(2500.03));
/// assert_eq!(schedule[3].due_date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
/// ```
pub fn quarterly_schedule(
    tax_year: i32,
    annual_tax: Decimal,
) -> Vec<QuarterlyPayment> {
    payment_schedule(tax_year, round_half_up(annual_tax / Decimal::from(4)))
}

/// Four payments of an already-computed quarterly `amount`.
///
/// `tax_year` is expected to lie within the range [`TaxTables::validate`]
/// accepts; a year whose due dates cannot be represented yields no payments
/// for those dates.
///
/// [`TaxTables::validate`]: crate::TaxTables::validate
pub fn payment_schedule(
    tax_year: i32,
    amount: Decimal,
) -> Vec<QuarterlyPayment> {
    DUE_DATES
        .iter()
        .filter_map(|&(quarter, month, day, offset)| {
            NaiveDate::from_ymd_opt(tax_year + offset, month, day).map(|due_date| QuarterlyPayment {
                quarter,
                due_date,
                amount,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn schedule_has_four_equal_payments() {
        let schedule = quarterly_schedule(2024, dec!(20000));

        let amounts: Vec<_> = schedule.iter().map(|p| p.amount).collect();

        assert_eq!(amounts, vec![dec!(5000); 4]);
    }

    #[test]
    fn due_dates_follow_estimated_tax_calendar() {
        let schedule = quarterly_schedule(2024, dec!(0));

        let dates: Vec<_> = schedule.iter().map(|p| p.due_date.to_string()).collect();

        assert_eq!(
            dates,
            vec!["2024-04-15", "2024-06-15", "2024-09-15", "2025-01-15"]
        );
        assert_eq!(schedule[3].quarter, 4);
    }

    #[test]
    fn last_valid_tax_year_has_four_payments() {
        let schedule = payment_schedule(crate::models::MAX_TAX_YEAR, dec!(1));

        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule[3].due_date.to_string(), "9999-01-15");
    }

    #[test]
    fn payment_schedule_keeps_amount_as_given() {
        let schedule = payment_schedule(2025, dec!(1234.57));

        assert!(schedule.iter().all(|p| p.amount == dec!(1234.57)));
        assert_eq!(schedule[0].due_date.to_string(), "2025-04-15");
    }
}
