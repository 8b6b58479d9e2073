//! Nonrefundable credits: child and dependent credit, simplified education
//! credit.
//!
//! The child credit loses a fixed amount for every full phase-out step of AGI
//! above the threshold, so it drops in discrete stairs rather than smoothly.
//! Capping the credits at the tax owed happens in the pipeline, not here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::floor_at_zero;
use crate::{FilingStatus, FilingStatusTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditConfig {
    /// Credit per child under 17.
    pub child_under_17_amount: Decimal,
    /// Credit per other dependent (children 17 and older).
    pub other_dependent_amount: Decimal,
    /// AGI above which the child credit phases out.
    pub phase_out_thresholds: FilingStatusTable<Decimal>,
    /// Width of one phase-out step ($1,000).
    pub phase_out_step: Decimal,
    /// Reduction per full step ($50).
    pub phase_out_reduction: Decimal,
    pub education_rate: Decimal,
    pub education_cap: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditResult {
    pub child_tax_credit: Decimal,
    pub education_credit: Decimal,
    pub total_credits: Decimal,
}

#[derive(Debug, Clone)]
pub struct CreditCalculator<'a> {
    config: &'a CreditConfig,
}

impl<'a> CreditCalculator<'a> {
    pub fn new(config: &'a CreditConfig) -> Self {
        Self { config }
    }

    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{FilingStatus, TaxTables};
    /// use tax_core::calculations::CreditCalculator;
    ///
    /// let tables = TaxTables::tax_year_2024();
    /// let credits = CreditCalculator::new(&tables.credits).calculate(
    ///     2,
    ///     0,
    ///     dec!(0),
    ///     dec!(250000),
    ///     FilingStatus::Single,
    /// );
    ///
    /// assert_eq!(credits.child_tax_credit, dec!(1500));
    /// ```
    pub fn calculate(
        &self,
        children_under_17: u32,
        children_17_plus: u32,
        education_expenses: Decimal,
        agi: Decimal,
        filing_status: FilingStatus,
    ) -> CreditResult {
        let child_tax_credit =
            self.child_tax_credit(children_under_17, children_17_plus, agi, filing_status);
        let education_credit = self.education_credit(education_expenses);

        CreditResult {
            child_tax_credit,
            education_credit,
            total_credits: child_tax_credit + education_credit,
        }
    }

    pub fn child_tax_credit(
        &self,
        children_under_17: u32,
        children_17_plus: u32,
        agi: Decimal,
        filing_status: FilingStatus,
    ) -> Decimal {
        let credit = Decimal::from(children_under_17) * self.config.child_under_17_amount
            + Decimal::from(children_17_plus) * self.config.other_dependent_amount;

        let threshold = *self.config.phase_out_thresholds.get(filing_status);
        if agi <= threshold {
            return credit;
        }

        let steps = (agi - threshold)
            .checked_div(self.config.phase_out_step)
            .map_or(Decimal::ZERO, |steps| steps.floor());
        let reduction = steps * self.config.phase_out_reduction;
        debug!(
            agi = %agi,
            threshold = %threshold,
            credit = %credit,
            reduction = %reduction,
            "phasing out child tax credit"
        );

        floor_at_zero(credit - reduction)
    }

    /// A flat share of education expenses, capped, with no phase-out.
    pub fn education_credit(
        &self,
        education_expenses: Decimal,
    ) -> Decimal {
        (education_expenses * self.config.education_rate).min(self.config.education_cap)
    }
}
