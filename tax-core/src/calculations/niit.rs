//! Net investment income tax (NIIT).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::FilingStatus;
use crate::FilingStatusTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiitConfig {
    /// Surtax rate (3.8%).
    pub rate: Decimal,
    /// MAGI above which the surtax applies.
    pub thresholds: FilingStatusTable<Decimal>,
}

/// Computes the surtax on the smaller of investment income and the MAGI in
/// excess of the filing-status threshold.
///
/// MAGI at or below the threshold owes nothing. A negative investment total
/// is not clipped, so net investment losses reduce the total tax.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{FilingStatus, TaxTables};
/// use tax_core::calculations::net_investment_income_tax;
///
/// let tables = TaxTables::tax_year_2024();
/// let niit = net_investment_income_tax(
///     dec!(300000),
///     dec!(50000),
///     FilingStatus::Single,
///     &tables.niit,
/// );
///
/// assert_eq!(niit, dec!(1900));
/// ```
pub fn net_investment_income_tax(
    magi: Decimal,
    investment_income: Decimal,
    filing_status: FilingStatus,
    config: &NiitConfig,
) -> Decimal {
    let threshold = *config.thresholds.get(filing_status);
    if magi <= threshold {
        return Decimal::ZERO;
    }

    let excess = magi - threshold;
    let base = excess.min(investment_income);
    debug!(
        magi = %magi,
        threshold = %threshold,
        investment_income = %investment_income,
        base = %base,
        "applying net investment income tax"
    );

    base * config.rate
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_config() -> NiitConfig {
        let mut thresholds = FilingStatusTable::single_only(dec!(200000));
        thresholds.set(FilingStatus::MarriedFilingJointly, dec!(250000));
        thresholds.set(FilingStatus::MarriedFilingSeparately, dec!(125000));
        NiitConfig {
            rate: dec!(0.038),
            thresholds,
        }
    }

    #[test]
    fn below_threshold_owes_nothing() {
        let niit =
            net_investment_income_tax(dec!(150000), dec!(50000), FilingStatus::Single, &test_config());

        assert_eq!(niit, Decimal::ZERO);
    }

    #[test]
    fn exactly_at_threshold_owes_nothing() {
        let niit =
            net_investment_income_tax(dec!(200000), dec!(50000), FilingStatus::Single, &test_config());

        assert_eq!(niit, Decimal::ZERO);
    }

    #[test]
    fn investment_income_limits_the_base() {
        let niit =
            net_investment_income_tax(dec!(300000), dec!(50000), FilingStatus::Single, &test_config());

        assert_eq!(niit, dec!(1900));
    }

    #[test]
    fn excess_limits_the_base() {
        let niit =
            net_investment_income_tax(dec!(210000), dec!(50000), FilingStatus::Single, &test_config());

        assert_eq!(niit, dec!(380));
    }

    #[test]
    fn joint_filers_use_their_own_threshold() {
        let niit = net_investment_income_tax(
            dec!(300000),
            dec!(100000),
            FilingStatus::MarriedFilingJointly,
            &test_config(),
        );

        assert_eq!(niit, dec!(1900));
    }

    #[test]
    fn missing_threshold_falls_back_to_single() {
        let niit = net_investment_income_tax(
            dec!(300000),
            dec!(50000),
            FilingStatus::QualifyingSurvivingSpouse,
            &test_config(),
        );

        assert_eq!(niit, dec!(1900));
    }

    #[test]
    fn negative_investment_income_is_not_clipped() {
        let niit =
            net_investment_income_tax(dec!(300000), dec!(-5000), FilingStatus::Single, &test_config());

        assert_eq!(niit, dec!(-190));
    }
}
