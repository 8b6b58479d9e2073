//! Standard versus itemized deduction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::floor_at_zero;
use crate::{DeductionType, FilingStatus, FilingStatusTable, StandardDeduction, TaxInput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedDeductionConfig {
    /// Cap on property tax plus state and local tax paid.
    pub salt_cap: Decimal,
    /// Share of AGI that medical expenses must exceed (7.5%).
    pub medical_floor_fraction: Decimal,
}

/// The itemizable amounts from a [`TaxInput`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizableExpenses {
    pub mortgage_interest: Decimal,
    pub property_tax: Decimal,
    pub state_tax_paid: Decimal,
    pub charitable: Decimal,
    pub medical: Decimal,
}

impl From<&TaxInput> for ItemizableExpenses {
    fn from(input: &TaxInput) -> Self {
        Self {
            mortgage_interest: input.mortgage_interest,
            property_tax: input.property_tax,
            state_tax_paid: input.state_tax_paid,
            charitable: input.charitable,
            medical: input.medical,
        }
    }
}

/// The deduction that applies together with both candidate amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionChoice {
    pub amount: Decimal,
    pub deduction_type: DeductionType,
    pub standard: Decimal,
    pub itemized: Decimal,
}

/// Chooses between the standard and itemized deduction.
#[derive(Debug, Clone)]
pub struct DeductionSelector<'a> {
    standard_deductions: &'a FilingStatusTable<StandardDeduction>,
    config: &'a ItemizedDeductionConfig,
}

impl<'a> DeductionSelector<'a> {
    pub fn new(
        standard_deductions: &'a FilingStatusTable<StandardDeduction>,
        config: &'a ItemizedDeductionConfig,
    ) -> Self {
        Self {
            standard_deductions,
            config,
        }
    }

    /// Returns the larger of the two deductions. Itemizing wins only when it
    /// strictly exceeds the standard amount.
    pub fn select(
        &self,
        agi: Decimal,
        expenses: &ItemizableExpenses,
        filing_status: FilingStatus,
        age_65_plus: bool,
        spouse_age_65_plus: bool,
    ) -> DeductionChoice {
        let standard = self.standard_amount(filing_status, age_65_plus, spouse_age_65_plus);
        let itemized = self.itemized_amount(agi, expenses);

        let (amount, deduction_type) = if itemized > standard {
            (itemized, DeductionType::Itemized)
        } else {
            (standard, DeductionType::Standard)
        };
        debug!(
            standard = %standard,
            itemized = %itemized,
            deduction_type = %deduction_type,
            "selected deduction"
        );

        DeductionChoice {
            amount,
            deduction_type,
            standard,
            itemized,
        }
    }

    /// Standard deduction plus one age-65 add-on for the taxpayer and, on a
    /// joint return, one for the spouse.
    pub fn standard_amount(
        &self,
        filing_status: FilingStatus,
        age_65_plus: bool,
        spouse_age_65_plus: bool,
    ) -> Decimal {
        let entry = self.standard_deductions.get(filing_status);
        let mut amount = entry.amount;
        if age_65_plus {
            amount += entry.age_65_addon;
        }
        if spouse_age_65_plus && filing_status == FilingStatus::MarriedFilingJointly {
            amount += entry.age_65_addon;
        }
        amount
    }

    /// Mortgage interest, capped SALT, charitable gifts and medical expenses
    /// above the AGI floor.
    pub fn itemized_amount(
        &self,
        agi: Decimal,
        expenses: &ItemizableExpenses,
    ) -> Decimal {
        let salt = (expenses.property_tax + expenses.state_tax_paid).min(self.config.salt_cap);
        let medical = floor_at_zero(expenses.medical - agi * self.config.medical_floor_fraction);

        expenses.mortgage_interest + salt + expenses.charitable + medical
    }
}
