use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionType {
    Standard,
    Itemized,
}

impl DeductionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Itemized => "itemized",
        }
    }
}

impl std::fmt::Display for DeductionType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Breakdown keys, in the order they are reported.
pub const BREAKDOWN_FEDERAL_ORDINARY: &str = "federal_ordinary";
pub const BREAKDOWN_FEDERAL_LTCG: &str = "federal_ltcg";
pub const BREAKDOWN_SE_TAX: &str = "se_tax";
pub const BREAKDOWN_NIIT: &str = "niit";
pub const BREAKDOWN_STATE_TAX: &str = "state_tax";
pub const BREAKDOWN_CREDITS_APPLIED: &str = "credits_applied";

/// Computed liability for one taxpayer-year.
///
/// Monetary fields are rounded to cents. `marginal_rate` is a percentage with
/// one decimal place, `effective_rate` a percentage with two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    // AGI
    pub gross_income: Decimal,
    pub adjustments: Decimal,
    pub agi: Decimal,

    // Taxable income
    pub deductions: Decimal,
    pub deduction_type: DeductionType,
    pub taxable_income: Decimal,

    // Federal tax
    pub federal_tax_ordinary: Decimal,
    pub federal_tax_ltcg: Decimal,
    pub federal_tax_total: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,

    // Self-employment tax
    pub se_tax: Decimal,
    pub se_deduction: Decimal,

    // State tax
    pub state_tax: Decimal,
    pub state: String,

    // Credits
    pub child_tax_credit: Decimal,
    pub education_credits: Decimal,
    pub total_credits: Decimal,

    // Totals
    pub total_tax: Decimal,
    pub tax_after_credits: Decimal,
    pub quarterly_estimate: Decimal,

    pub breakdown: BTreeMap<String, Decimal>,
}

impl TaxResult {
    /// Looks up a breakdown entry, returning zero when absent.
    pub fn breakdown_amount(
        &self,
        key: &str,
    ) -> Decimal {
        self.breakdown.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    /// Net investment income tax as reported in the breakdown.
    pub fn niit(&self) -> Decimal {
        self.breakdown_amount(BREAKDOWN_NIIT)
    }
}
