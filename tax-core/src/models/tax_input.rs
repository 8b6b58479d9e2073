use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FilingStatus;
use crate::calculations::normalize_state_code;

/// Largest magnitude accepted for any single amount. Sums and products of
/// amounts this size stay well inside the range of [`Decimal`].
pub const MAX_INPUT_AMOUNT: Decimal = dec!(1000000000000000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxInputError {
    #[error("{field} must be between -1e15 and 1e15, got {amount}")]
    AmountOutOfRange { field: &'static str, amount: Decimal },
}

/// One taxpayer-year as supplied by the caller.
///
/// Every field defaults to zero / `false`, the filing status to
/// [`FilingStatus::Single`] and the state to `CA`, so serialized inputs only
/// need to carry the fields that apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxInput {
    // Income
    pub wages: Decimal,
    /// Schedule C net profit.
    pub self_employment: Decimal,
    pub interest: Decimal,
    pub dividends_qualified: Decimal,
    pub dividends_ordinary: Decimal,
    pub short_term_gains: Decimal,
    pub long_term_gains: Decimal,
    /// Net rental income; may be negative.
    pub rental_income: Decimal,
    /// Partnership / S-Corp pass-through income.
    pub k1_income: Decimal,
    pub other_income: Decimal,

    // Itemizable amounts
    pub mortgage_interest: Decimal,
    pub property_tax: Decimal,
    pub state_tax_paid: Decimal,
    pub charitable: Decimal,
    pub medical: Decimal,

    // Pre-tax contributions
    /// Informational only; callers already exclude it from `wages`.
    pub traditional_401k: Decimal,
    pub traditional_ira: Decimal,
    pub hsa: Decimal,

    // Credit inputs
    pub children_under_17: u32,
    pub children_17_plus: u32,
    pub education_expenses: Decimal,

    // Filing context
    pub filing_status: FilingStatus,
    /// Two-letter state code.
    pub state: String,
    pub age_65_plus: bool,
    pub spouse_age_65_plus: bool,
}

impl Default for TaxInput {
    fn default() -> Self {
        Self {
            wages: Decimal::ZERO,
            self_employment: Decimal::ZERO,
            interest: Decimal::ZERO,
            dividends_qualified: Decimal::ZERO,
            dividends_ordinary: Decimal::ZERO,
            short_term_gains: Decimal::ZERO,
            long_term_gains: Decimal::ZERO,
            rental_income: Decimal::ZERO,
            k1_income: Decimal::ZERO,
            other_income: Decimal::ZERO,
            mortgage_interest: Decimal::ZERO,
            property_tax: Decimal::ZERO,
            state_tax_paid: Decimal::ZERO,
            charitable: Decimal::ZERO,
            medical: Decimal::ZERO,
            traditional_401k: Decimal::ZERO,
            traditional_ira: Decimal::ZERO,
            hsa: Decimal::ZERO,
            children_under_17: 0,
            children_17_plus: 0,
            education_expenses: Decimal::ZERO,
            filing_status: FilingStatus::Single,
            state: "CA".to_string(),
            age_65_plus: false,
            spouse_age_65_plus: false,
        }
    }
}

impl TaxInput {
    /// Rejects amounts whose magnitude exceeds [`MAX_INPUT_AMOUNT`].
    ///
    /// Negative and zero amounts are accepted. Callers that build inputs from
    /// external data run this before handing the input to a calculator.
    ///
    /// # Errors
    ///
    /// Returns [`TaxInputError::AmountOutOfRange`] for the first offending
    /// field.
    pub fn validate(&self) -> Result<(), TaxInputError> {
        let amounts = [
            ("wages", self.wages),
            ("self_employment", self.self_employment),
            ("interest", self.interest),
            ("dividends_qualified", self.dividends_qualified),
            ("dividends_ordinary", self.dividends_ordinary),
            ("short_term_gains", self.short_term_gains),
            ("long_term_gains", self.long_term_gains),
            ("rental_income", self.rental_income),
            ("k1_income", self.k1_income),
            ("other_income", self.other_income),
            ("mortgage_interest", self.mortgage_interest),
            ("property_tax", self.property_tax),
            ("state_tax_paid", self.state_tax_paid),
            ("charitable", self.charitable),
            ("medical", self.medical),
            ("traditional_401k", self.traditional_401k),
            ("traditional_ira", self.traditional_ira),
            ("hsa", self.hsa),
            ("education_expenses", self.education_expenses),
        ];

        for (field, amount) in amounts {
            if amount.abs() > MAX_INPUT_AMOUNT {
                return Err(TaxInputError::AmountOutOfRange { field, amount });
            }
        }
        Ok(())
    }

    /// Sum of every income field (step 1 of the pipeline).
    pub fn gross_income(&self) -> Decimal {
        self.wages
            + self.self_employment
            + self.interest
            + self.dividends_qualified
            + self.dividends_ordinary
            + self.short_term_gains
            + self.long_term_gains
            + self.rental_income
            + self.k1_income
            + self.other_income
    }

    /// The state code trimmed and uppercased, as reported in the result.
    pub fn state_code(&self) -> String {
        normalize_state_code(&self.state)
    }

    /// Long-term gains plus qualified dividends.
    pub fn preferential_income(&self) -> Decimal {
        self.long_term_gains + self.dividends_qualified
    }

    /// Income subject to the net investment income tax. Rental losses do not
    /// offset other investment income.
    pub fn investment_income(&self) -> Decimal {
        self.interest
            + self.dividends_qualified
            + self.dividends_ordinary
            + self.short_term_gains
            + self.long_term_gains
            + self.rental_income.max(Decimal::ZERO)
    }
}
