//! The full liability computation.
//!
//! [`TaxCalculator`] runs the calculators in a fixed order, each step feeding
//! the ones after it:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross income (sum of all income fields) |
//! | 2    | SE tax and SE deduction, from self-employment income alone |
//! | 3    | Adjustments = SE deduction + traditional IRA + HSA |
//! | 4    | AGI = gross income − adjustments |
//! | 5    | Deduction (standard or itemized), using AGI |
//! | 6    | Taxable income = max(0, AGI − deduction) |
//! | 7    | Ordinary taxable = max(0, taxable − long-term gains − qualified dividends) |
//! | 8    | Federal tax on ordinary taxable income, with marginal rate |
//! | 9    | Federal tax on preferential income, stacked on top |
//! | 10   | Federal total = steps 8 + 9 |
//! | 11   | Investment income (rental losses excluded) |
//! | 12   | NIIT, using AGI as MAGI |
//! | 13   | State tax = taxable income × state rate |
//! | 14   | Credits, using AGI |
//! | 15   | Total tax = federal + SE + NIIT + state |
//! | 16   | Tax after credits = max(0, total − credits) |
//! | 17   | Effective rate = tax after credits ÷ gross income |
//! | 18   | Quarterly estimate = tax after credits ÷ 4 |
//!
//! Intermediate values keep full precision; rounding happens once, when the
//! [`TaxResult`] is assembled.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{DeductionType, TaxCalculator, TaxInput, TaxTables};
//!
//! let tables = TaxTables::tax_year_2024();
//! let calculator = TaxCalculator::new(&tables).unwrap();
//!
//! let input = TaxInput {
//!     wages: dec!(64600),
//!     state: "TX".to_string(),
//!     ..TaxInput::default()
//! };
//! let result = calculator.calculate(&input);
//!
//! assert_eq!(result.taxable_income, dec!(50000.00));
//! assert_eq!(result.deduction_type, DeductionType::Standard);
//! assert_eq!(result.federal_tax_ordinary, dec!(6053.00));
//! assert_eq!(result.marginal_rate, dec!(22.0));
//! assert_eq!(result.tax_after_credits, dec!(6053.00));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::calculations::brackets::progressive_tax;
use crate::calculations::common::{floor_at_zero, round_half_up, to_percent};
use crate::calculations::credits::CreditCalculator;
use crate::calculations::deductions::{DeductionSelector, ItemizableExpenses};
use crate::calculations::niit::net_investment_income_tax;
use crate::calculations::preferential::preferential_tax;
use crate::calculations::quarterly::{QuarterlyPayment, payment_schedule};
use crate::calculations::self_emp::SelfEmploymentTax;
use crate::{
    BREAKDOWN_CREDITS_APPLIED, BREAKDOWN_FEDERAL_LTCG, BREAKDOWN_FEDERAL_ORDINARY,
    BREAKDOWN_NIIT, BREAKDOWN_SE_TAX, BREAKDOWN_STATE_TAX, DeductionType, TaxInput, TaxResult,
    TaxTables, TaxTablesError,
};

/// Computes a [`TaxResult`] from a [`TaxInput`] against one set of tables.
///
/// The calculator only borrows its tables, so any number of calculators
/// (on any number of threads) can share one [`TaxTables`].
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> TaxCalculator<'a> {
    /// Validates `tables` and returns a calculator bound to them.
    ///
    /// # Errors
    ///
    /// Returns [`TaxTablesError`] if the tables are malformed.
    pub fn new(tables: &'a TaxTables) -> Result<Self, TaxTablesError> {
        tables.validate()?;
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &'a TaxTables {
        self.tables
    }

    /// Estimated-payment due dates for `result`, each for its
    /// `quarterly_estimate`.
    pub fn quarterly_schedule(
        &self,
        result: &TaxResult,
    ) -> Vec<QuarterlyPayment> {
        payment_schedule(self.tables.tax_year, result.quarterly_estimate)
    }

    /// Runs the full pipeline for one taxpayer-year.
    ///
    /// Amounts are expected to be within [`TaxInput::validate`]'s bounds;
    /// larger ones can overflow [`Decimal`] arithmetic.
    #[instrument(skip_all, fields(tax_year = self.tables.tax_year, filing_status = %input.filing_status))]
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> TaxResult {
        let tables = self.tables;
        let filing_status = input.filing_status;

        // Steps 1-4: gross income, SE tax, adjustments, AGI
        let gross_income = input.gross_income();
        let se = SelfEmploymentTax::new(&tables.self_employment).calculate(input.self_employment);
        let adjustments = se.se_tax_deduction + input.traditional_ira + input.hsa;
        let agi = gross_income - adjustments;
        debug!(gross_income = %gross_income, adjustments = %adjustments, agi = %agi, "computed AGI");

        // Steps 5-6: deduction and taxable income
        let deduction = DeductionSelector::new(&tables.standard_deduction, &tables.itemized).select(
            agi,
            &ItemizableExpenses::from(input),
            filing_status,
            input.age_65_plus,
            input.spouse_age_65_plus,
        );
        let taxable_income = floor_at_zero(agi - deduction.amount);

        // Steps 7-10: federal tax on ordinary and preferential income
        let ordinary_taxable = floor_at_zero(taxable_income - input.preferential_income());
        let ordinary = progressive_tax(ordinary_taxable, tables.ordinary_brackets(filing_status));
        let federal_ltcg = preferential_tax(
            input.long_term_gains,
            input.dividends_qualified,
            taxable_income,
            tables.preferential_brackets(filing_status),
        );
        let federal_total = ordinary.tax + federal_ltcg;
        debug!(
            taxable_income = %taxable_income,
            ordinary_taxable = %ordinary_taxable,
            federal_ordinary = %ordinary.tax,
            federal_ltcg = %federal_ltcg,
            "computed federal tax"
        );

        // Steps 11-13: NIIT and state tax
        let niit =
            net_investment_income_tax(agi, input.investment_income(), filing_status, &tables.niit);
        let state = input.state_code();
        let state_tax = tables.state.state_tax(taxable_income, &state);

        // Step 14: credits
        let credits = CreditCalculator::new(&tables.credits).calculate(
            input.children_under_17,
            input.children_17_plus,
            input.education_expenses,
            agi,
            filing_status,
        );

        // Steps 15-18: totals
        let total_tax = federal_total + se.self_employment_tax + niit + state_tax;
        let tax_after_credits = floor_at_zero(total_tax - credits.total_credits);
        let effective_rate = if gross_income > Decimal::ZERO {
            tax_after_credits / gross_income
        } else {
            Decimal::ZERO
        };
        let quarterly_estimate = tax_after_credits / Decimal::from(4);
        debug!(
            total_tax = %total_tax,
            total_credits = %credits.total_credits,
            tax_after_credits = %tax_after_credits,
            "computed liability"
        );

        Liability {
            gross_income,
            adjustments,
            agi,
            deductions: deduction.amount,
            deduction_type: deduction.deduction_type,
            taxable_income,
            federal_tax_ordinary: ordinary.tax,
            federal_tax_ltcg: federal_ltcg,
            federal_tax_total: federal_total,
            effective_rate,
            marginal_rate: ordinary.marginal_rate,
            se_tax: se.self_employment_tax,
            se_deduction: se.se_tax_deduction,
            niit,
            state_tax,
            state,
            child_tax_credit: credits.child_tax_credit,
            education_credits: credits.education_credit,
            total_credits: credits.total_credits,
            total_tax,
            tax_after_credits,
            quarterly_estimate,
        }
        .assemble()
    }
}

/// Unrounded pipeline output.
struct Liability {
    gross_income: Decimal,
    adjustments: Decimal,
    agi: Decimal,
    deductions: Decimal,
    deduction_type: DeductionType,
    taxable_income: Decimal,
    federal_tax_ordinary: Decimal,
    federal_tax_ltcg: Decimal,
    federal_tax_total: Decimal,
    /// Fraction, not percent.
    effective_rate: Decimal,
    /// Fraction, not percent.
    marginal_rate: Decimal,
    se_tax: Decimal,
    se_deduction: Decimal,
    niit: Decimal,
    state_tax: Decimal,
    state: String,
    child_tax_credit: Decimal,
    education_credits: Decimal,
    total_credits: Decimal,
    total_tax: Decimal,
    tax_after_credits: Decimal,
    quarterly_estimate: Decimal,
}

impl Liability {
    fn assemble(self) -> TaxResult {
        let breakdown: BTreeMap<String, Decimal> = [
            (BREAKDOWN_FEDERAL_ORDINARY, self.federal_tax_ordinary),
            (BREAKDOWN_FEDERAL_LTCG, self.federal_tax_ltcg),
            (BREAKDOWN_SE_TAX, self.se_tax),
            (BREAKDOWN_NIIT, self.niit),
            (BREAKDOWN_STATE_TAX, self.state_tax),
            (BREAKDOWN_CREDITS_APPLIED, self.total_credits),
        ]
        .into_iter()
        .map(|(key, amount)| (key.to_string(), round_half_up(amount)))
        .collect();

        TaxResult {
            gross_income: round_half_up(self.gross_income),
            adjustments: round_half_up(self.adjustments),
            agi: round_half_up(self.agi),
            deductions: round_half_up(self.deductions),
            deduction_type: self.deduction_type,
            taxable_income: round_half_up(self.taxable_income),
            federal_tax_ordinary: round_half_up(self.federal_tax_ordinary),
            federal_tax_ltcg: round_half_up(self.federal_tax_ltcg),
            federal_tax_total: round_half_up(self.federal_tax_total),
            effective_rate: to_percent(self.effective_rate, 2),
            marginal_rate: to_percent(self.marginal_rate, 1),
            se_tax: round_half_up(self.se_tax),
            se_deduction: round_half_up(self.se_deduction),
            state_tax: round_half_up(self.state_tax),
            state: self.state,
            child_tax_credit: round_half_up(self.child_tax_credit),
            education_credits: round_half_up(self.education_credits),
            total_credits: round_half_up(self.total_credits),
            total_tax: round_half_up(self.total_tax),
            tax_after_credits: round_half_up(self.tax_after_credits),
            quarterly_estimate: round_half_up(self.quarterly_estimate),
            breakdown,
        }
    }
}
