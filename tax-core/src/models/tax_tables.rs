//! Versioned tax-year constants.
//!
//! A [`TaxTables`] value carries every rate, bracket and threshold the
//! calculators need for one tax year. Tables are built once (from
//! [`TaxTables::tax_year_2024`] or a configuration file), validated with
//! [`TaxTables::validate`], and then only ever borrowed immutably. Supporting
//! another year means constructing another `TaxTables`, never mutating one in
//! place while computations are running.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{FilingStatus, FilingStatusTable, StandardDeduction, TaxBracket};
use crate::calculations::{
    CreditConfig, ItemizedDeductionConfig, NiitConfig, SelfEmploymentConfig,
    SelfEmploymentConfigError, StateTaxConfig,
};

/// Errors describing malformed tax tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTablesError {
    #[error("{schedule} bracket schedule for {filing_status} is empty")]
    EmptySchedule {
        schedule: &'static str,
        filing_status: FilingStatus,
    },

    #[error(
        "{schedule} bracket schedule for {filing_status} is not strictly ascending at bound {bound}"
    )]
    UnsortedBrackets {
        schedule: &'static str,
        filing_status: FilingStatus,
        bound: Decimal,
    },

    #[error("{schedule} bracket schedule for {filing_status} has an unbounded bracket before the last one")]
    UnboundedBracketNotLast {
        schedule: &'static str,
        filing_status: FilingStatus,
    },

    #[error("{schedule} bracket schedule for {filing_status} must end with an unbounded bracket")]
    MissingTopBracket {
        schedule: &'static str,
        filing_status: FilingStatus,
    },

    #[error("{field} must be between 0 and 1, got {rate}")]
    InvalidRate { field: String, rate: Decimal },

    #[error("{field} must be non-negative, got {amount}")]
    NegativeAmount { field: String, amount: Decimal },

    #[error("credit phase-out step must be positive, got {0}")]
    InvalidPhaseOutStep(Decimal),

    #[error("state code '{0}' must be two uppercase ASCII letters")]
    InvalidStateCode(String),

    #[error("tax year {0} is outside 1913..=9998")]
    TaxYearOutOfRange(i32),

    #[error("invalid self-employment constants: {0}")]
    SelfEmployment(#[from] SelfEmploymentConfigError),
}

/// First year of the modern federal income tax.
pub const MIN_TAX_YEAR: i32 = 1913;
/// Last year whose estimated-payment dates fit a four-digit calendar year.
pub const MAX_TAX_YEAR: i32 = 9998;

pub(crate) const ORDINARY_SCHEDULE: &str = "ordinary";
pub(crate) const PREFERENTIAL_SCHEDULE: &str = "preferential";

/// All constants for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    pub tax_year: i32,
    /// Federal rate schedules for ordinary income.
    pub ordinary_brackets: FilingStatusTable<Vec<TaxBracket>>,
    /// Rate schedules for long-term gains and qualified dividends.
    pub preferential_brackets: FilingStatusTable<Vec<TaxBracket>>,
    pub standard_deduction: FilingStatusTable<StandardDeduction>,
    pub itemized: ItemizedDeductionConfig,
    pub self_employment: SelfEmploymentConfig,
    pub niit: NiitConfig,
    pub credits: CreditConfig,
    pub state: StateTaxConfig,
}

impl TaxTables {
    pub fn ordinary_brackets(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.ordinary_brackets.get(status)
    }

    pub fn preferential_brackets(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.preferential_brackets.get(status)
    }

    /// Checks every table for internal consistency.
    ///
    /// This is meant to run once, when tables are loaded, so that a bad
    /// configuration is reported before any computation uses it.
    ///
    /// # Errors
    ///
    /// Returns the first [`TaxTablesError`] found.
    pub fn validate(&self) -> Result<(), TaxTablesError> {
        if !(MIN_TAX_YEAR..=MAX_TAX_YEAR).contains(&self.tax_year) {
            return Err(TaxTablesError::TaxYearOutOfRange(self.tax_year));
        }
        validate_schedules(ORDINARY_SCHEDULE, &self.ordinary_brackets)?;
        validate_schedules(PREFERENTIAL_SCHEDULE, &self.preferential_brackets)?;

        for (status, deduction) in self.standard_deduction.entries() {
            non_negative(
                format!("standard_deduction.{}.amount", status.name()),
                deduction.amount,
            )?;
            non_negative(
                format!("standard_deduction.{}.age_65_addon", status.name()),
                deduction.age_65_addon,
            )?;
        }

        non_negative("itemized.salt_cap".to_string(), self.itemized.salt_cap)?;
        unit_rate(
            "itemized.medical_floor_fraction".to_string(),
            self.itemized.medical_floor_fraction,
        )?;

        self.self_employment.validate()?;

        unit_rate("niit.rate".to_string(), self.niit.rate)?;
        for (status, threshold) in self.niit.thresholds.entries() {
            non_negative(format!("niit.thresholds.{}", status.name()), *threshold)?;
        }

        self.validate_credits()?;
        self.validate_state_rates()
    }

    fn validate_credits(&self) -> Result<(), TaxTablesError> {
        let credits = &self.credits;
        non_negative(
            "credits.child_under_17_amount".to_string(),
            credits.child_under_17_amount,
        )?;
        non_negative(
            "credits.other_dependent_amount".to_string(),
            credits.other_dependent_amount,
        )?;
        for (status, threshold) in credits.phase_out_thresholds.entries() {
            non_negative(
                format!("credits.phase_out_thresholds.{}", status.name()),
                *threshold,
            )?;
        }
        if credits.phase_out_step <= Decimal::ZERO {
            return Err(TaxTablesError::InvalidPhaseOutStep(credits.phase_out_step));
        }
        non_negative(
            "credits.phase_out_reduction".to_string(),
            credits.phase_out_reduction,
        )?;
        unit_rate("credits.education_rate".to_string(), credits.education_rate)?;
        non_negative("credits.education_cap".to_string(), credits.education_cap)
    }

    fn validate_state_rates(&self) -> Result<(), TaxTablesError> {
        unit_rate("state.fallback_rate".to_string(), self.state.fallback_rate)?;
        for (code, rate) in &self.state.rates {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(TaxTablesError::InvalidStateCode(code.clone()));
            }
            unit_rate(format!("state.rates.{code}"), *rate)?;
        }
        Ok(())
    }

    /// Tax year 2024 federal constants and simplified state rates.
    pub fn tax_year_2024() -> Self {
        let mut ordinary_brackets = FilingStatusTable::single_only(vec![
            TaxBracket::new(dec!(11600), dec!(0.10)),
            TaxBracket::new(dec!(47150), dec!(0.12)),
            TaxBracket::new(dec!(100525), dec!(0.22)),
            TaxBracket::new(dec!(191950), dec!(0.24)),
            TaxBracket::new(dec!(243725), dec!(0.32)),
            TaxBracket::new(dec!(609350), dec!(0.35)),
            TaxBracket::unbounded(dec!(0.37)),
        ]);
        ordinary_brackets.set(
            FilingStatus::MarriedFilingJointly,
            vec![
                TaxBracket::new(dec!(23200), dec!(0.10)),
                TaxBracket::new(dec!(94300), dec!(0.12)),
                TaxBracket::new(dec!(201050), dec!(0.22)),
                TaxBracket::new(dec!(383900), dec!(0.24)),
                TaxBracket::new(dec!(487450), dec!(0.32)),
                TaxBracket::new(dec!(731200), dec!(0.35)),
                TaxBracket::unbounded(dec!(0.37)),
            ],
        );
        ordinary_brackets.set(
            FilingStatus::MarriedFilingSeparately,
            vec![
                TaxBracket::new(dec!(11600), dec!(0.10)),
                TaxBracket::new(dec!(47150), dec!(0.12)),
                TaxBracket::new(dec!(100525), dec!(0.22)),
                TaxBracket::new(dec!(191950), dec!(0.24)),
                TaxBracket::new(dec!(243725), dec!(0.32)),
                TaxBracket::new(dec!(365600), dec!(0.35)),
                TaxBracket::unbounded(dec!(0.37)),
            ],
        );
        ordinary_brackets.set(
            FilingStatus::HeadOfHousehold,
            vec![
                TaxBracket::new(dec!(16550), dec!(0.10)),
                TaxBracket::new(dec!(63100), dec!(0.12)),
                TaxBracket::new(dec!(100500), dec!(0.22)),
                TaxBracket::new(dec!(191950), dec!(0.24)),
                TaxBracket::new(dec!(243700), dec!(0.32)),
                TaxBracket::new(dec!(609350), dec!(0.35)),
                TaxBracket::unbounded(dec!(0.37)),
            ],
        );

        let mut preferential_brackets = FilingStatusTable::single_only(vec![
            TaxBracket::new(dec!(47025), dec!(0.00)),
            TaxBracket::new(dec!(518900), dec!(0.15)),
            TaxBracket::unbounded(dec!(0.20)),
        ]);
        preferential_brackets.set(
            FilingStatus::MarriedFilingJointly,
            vec![
                TaxBracket::new(dec!(94050), dec!(0.00)),
                TaxBracket::new(dec!(583750), dec!(0.15)),
                TaxBracket::unbounded(dec!(0.20)),
            ],
        );

        let standard_deduction = FilingStatusTable {
            single: StandardDeduction::new(dec!(14600), dec!(1950)),
            married_joint: Some(StandardDeduction::new(dec!(29200), dec!(1550))),
            married_separate: Some(StandardDeduction::new(dec!(14600), dec!(1550))),
            head_of_household: Some(StandardDeduction::new(dec!(21900), dec!(1950))),
            qualifying_widow: Some(StandardDeduction::new(dec!(29200), dec!(1550))),
        };

        let niit = NiitConfig {
            rate: dec!(0.038),
            thresholds: FilingStatusTable {
                single: dec!(200000),
                married_joint: Some(dec!(250000)),
                married_separate: Some(dec!(125000)),
                head_of_household: Some(dec!(200000)),
                qualifying_widow: None,
            },
        };

        let mut phase_out_thresholds = FilingStatusTable::single_only(dec!(200000));
        phase_out_thresholds.set(FilingStatus::MarriedFilingJointly, dec!(400000));

        let credits = CreditConfig {
            child_under_17_amount: dec!(2000),
            other_dependent_amount: dec!(500),
            phase_out_thresholds,
            phase_out_step: dec!(1000),
            phase_out_reduction: dec!(50),
            education_rate: dec!(0.20),
            education_cap: dec!(2000),
        };

        let state_rates: BTreeMap<String, Decimal> = [
            ("CA", dec!(0.133)),
            ("NY", dec!(0.109)),
            ("TX", dec!(0.00)),
            ("FL", dec!(0.00)),
            ("WA", dec!(0.00)),
            ("NV", dec!(0.00)),
            ("WY", dec!(0.00)),
            ("SD", dec!(0.00)),
            ("AK", dec!(0.00)),
            ("TN", dec!(0.00)),
            ("NH", dec!(0.00)),
            ("NJ", dec!(0.1075)),
            ("MA", dec!(0.09)),
            ("IL", dec!(0.0495)),
            ("PA", dec!(0.0307)),
            ("AZ", dec!(0.025)),
            ("CO", dec!(0.044)),
            ("GA", dec!(0.0549)),
            ("NC", dec!(0.0525)),
            ("VA", dec!(0.0575)),
            ("OH", dec!(0.0399)),
            ("MI", dec!(0.0425)),
            ("MN", dec!(0.0985)),
            ("OR", dec!(0.099)),
            ("HI", dec!(0.11)),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect();

        Self {
            tax_year: 2024,
            ordinary_brackets,
            preferential_brackets,
            standard_deduction,
            itemized: ItemizedDeductionConfig {
                salt_cap: dec!(10000),
                medical_floor_fraction: dec!(0.075),
            },
            self_employment: SelfEmploymentConfig {
                net_earnings_factor: dec!(0.9235),
                ss_wage_base: dec!(168600),
                ss_tax_rate: dec!(0.124),
                medicare_tax_rate: dec!(0.029),
                additional_medicare_rate: dec!(0.009),
                additional_medicare_threshold: dec!(200000),
                deduction_factor: dec!(0.50),
            },
            niit,
            credits,
            state: StateTaxConfig {
                fallback_rate: dec!(0.05),
                rates: state_rates,
            },
        }
    }
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::tax_year_2024()
    }
}

fn validate_schedules(
    schedule: &'static str,
    table: &FilingStatusTable<Vec<TaxBracket>>,
) -> Result<(), TaxTablesError> {
    for (filing_status, brackets) in table.entries() {
        validate_schedule(schedule, filing_status, brackets)?;
    }
    Ok(())
}

fn validate_schedule(
    schedule: &'static str,
    filing_status: FilingStatus,
    brackets: &[TaxBracket],
) -> Result<(), TaxTablesError> {
    let Some((last, rest)) = brackets.split_last() else {
        return Err(TaxTablesError::EmptySchedule {
            schedule,
            filing_status,
        });
    };

    let mut floor = Decimal::ZERO;
    for bracket in rest {
        let Some(bound) = bracket.upper_bound else {
            return Err(TaxTablesError::UnboundedBracketNotLast {
                schedule,
                filing_status,
            });
        };
        if bound <= floor {
            return Err(TaxTablesError::UnsortedBrackets {
                schedule,
                filing_status,
                bound,
            });
        }
        floor = bound;
    }
    if last.upper_bound.is_some() {
        return Err(TaxTablesError::MissingTopBracket {
            schedule,
            filing_status,
        });
    }

    for bracket in brackets {
        unit_rate(
            format!("{schedule}_brackets.{}.rate", filing_status.name()),
            bracket.rate,
        )?;
    }
    Ok(())
}

fn unit_rate(
    field: String,
    rate: Decimal,
) -> Result<(), TaxTablesError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(TaxTablesError::InvalidRate { field, rate });
    }
    Ok(())
}

fn non_negative(
    field: String,
    amount: Decimal,
) -> Result<(), TaxTablesError> {
    if amount < Decimal::ZERO {
        return Err(TaxTablesError::NegativeAmount { field, amount });
    }
    Ok(())
}
