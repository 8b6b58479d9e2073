//! Self-employment tax.
//!
//! Self-employed taxpayers owe both halves of Social Security and Medicare on
//! their net earnings, and may deduct half of the resulting tax above the
//! line.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Net earnings = net profit × 92.35% |
//! | 2    | Social Security = min(net earnings, wage base) × 12.4% |
//! | 3    | Medicare = net earnings × 2.9% |
//! | 4    | Additional Medicare = (net earnings − threshold) × 0.9%, above the threshold only |
//! | 5    | SE tax = steps 2 + 3 + 4 |
//! | 6    | Deduction = SE tax × 50% |
//!
//! No value is rounded here; rounding happens once, when the final result is
//! assembled.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxTables;
//! use tax_core::calculations::SelfEmploymentTax;
//!
//! let tables = TaxTables::tax_year_2024();
//! let result = SelfEmploymentTax::new(&tables.self_employment).calculate(dec!(100000));
//!
//! assert_eq!(result.self_employment_tax, dec!(14129.55));
//! assert_eq!(result.se_tax_deduction, dec!(7064.775));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors describing out-of-range self-employment constants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelfEmploymentConfigError {
    /// The net earnings factor must be in (0, 1].
    #[error("net earnings factor must be between 0 and 1, got {0}")]
    InvalidNetEarningsFactor(Decimal),

    #[error("social security tax rate must be between 0 and 1, got {0}")]
    InvalidSocialSecurityRate(Decimal),

    #[error("medicare tax rate must be between 0 and 1, got {0}")]
    InvalidMedicareRate(Decimal),

    #[error("additional medicare tax rate must be between 0 and 1, got {0}")]
    InvalidAdditionalMedicareRate(Decimal),

    #[error("deduction factor must be between 0 and 1, got {0}")]
    InvalidDeductionFactor(Decimal),

    #[error("social security wage base must be positive, got {0}")]
    InvalidSsWageBase(Decimal),

    #[error("additional medicare threshold must be non-negative, got {0}")]
    InvalidAdditionalMedicareThreshold(Decimal),
}

/// Self-employment tax constants for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentConfig {
    /// Share of net profit treated as net earnings (92.35%).
    pub net_earnings_factor: Decimal,

    /// Maximum earnings subject to Social Security tax.
    ///
    /// For 2024, this is $168,600.
    pub ss_wage_base: Decimal,

    /// Combined employer and employee Social Security rate (12.4%).
    pub ss_tax_rate: Decimal,

    /// Combined employer and employee Medicare rate (2.9%).
    pub medicare_tax_rate: Decimal,

    /// Additional Medicare rate on net earnings above the threshold (0.9%).
    pub additional_medicare_rate: Decimal,

    pub additional_medicare_threshold: Decimal,

    /// Deductible share of the SE tax (50%).
    pub deduction_factor: Decimal,
}

impl SelfEmploymentConfig {
    /// Checks every constant against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`SelfEmploymentConfigError`] naming the first constant out of
    /// range.
    pub fn validate(&self) -> Result<(), SelfEmploymentConfigError> {
        if self.net_earnings_factor <= Decimal::ZERO || self.net_earnings_factor > Decimal::ONE {
            return Err(SelfEmploymentConfigError::InvalidNetEarningsFactor(
                self.net_earnings_factor,
            ));
        }
        if !is_unit_rate(self.ss_tax_rate) {
            return Err(SelfEmploymentConfigError::InvalidSocialSecurityRate(
                self.ss_tax_rate,
            ));
        }
        if !is_unit_rate(self.medicare_tax_rate) {
            return Err(SelfEmploymentConfigError::InvalidMedicareRate(
                self.medicare_tax_rate,
            ));
        }
        if !is_unit_rate(self.additional_medicare_rate) {
            return Err(SelfEmploymentConfigError::InvalidAdditionalMedicareRate(
                self.additional_medicare_rate,
            ));
        }
        if !is_unit_rate(self.deduction_factor) {
            return Err(SelfEmploymentConfigError::InvalidDeductionFactor(
                self.deduction_factor,
            ));
        }
        if self.ss_wage_base <= Decimal::ZERO {
            return Err(SelfEmploymentConfigError::InvalidSsWageBase(self.ss_wage_base));
        }
        if self.additional_medicare_threshold < Decimal::ZERO {
            return Err(SelfEmploymentConfigError::InvalidAdditionalMedicareThreshold(
                self.additional_medicare_threshold,
            ));
        }
        Ok(())
    }
}

fn is_unit_rate(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

/// Self-employment tax and its intermediate values, at full precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentTaxResult {
    /// Net profit after the net earnings factor.
    pub net_earnings: Decimal,

    /// Earnings subject to Social Security tax (capped at the wage base).
    pub ss_taxable_earnings: Decimal,

    pub social_security_tax: Decimal,

    /// Medicare tax including the additional Medicare portion.
    pub medicare_tax: Decimal,

    pub self_employment_tax: Decimal,

    /// Above-the-line deduction for half of the SE tax.
    pub se_tax_deduction: Decimal,
}

impl SelfEmploymentTaxResult {
    fn zero() -> Self {
        Self {
            net_earnings: Decimal::ZERO,
            ss_taxable_earnings: Decimal::ZERO,
            social_security_tax: Decimal::ZERO,
            medicare_tax: Decimal::ZERO,
            self_employment_tax: Decimal::ZERO,
            se_tax_deduction: Decimal::ZERO,
        }
    }
}

/// Calculator for self-employment tax.
#[derive(Debug, Clone)]
pub struct SelfEmploymentTax<'a> {
    config: &'a SelfEmploymentConfig,
}

impl<'a> SelfEmploymentTax<'a> {
    pub fn new(config: &'a SelfEmploymentConfig) -> Self {
        Self { config }
    }

    /// Computes SE tax and the SE deduction on a net profit.
    ///
    /// A profit of zero or less owes nothing.
    pub fn calculate(
        &self,
        net_profit: Decimal,
    ) -> SelfEmploymentTaxResult {
        if net_profit <= Decimal::ZERO {
            debug!(net_profit = %net_profit, "no self-employment profit; SE tax is zero");
            return SelfEmploymentTaxResult::zero();
        }

        let net_earnings = self.net_earnings(net_profit);
        let ss_taxable_earnings = self.ss_taxable_earnings(net_earnings);
        let social_security_tax = ss_taxable_earnings * self.config.ss_tax_rate;
        let medicare_tax = self.medicare_tax(net_earnings);
        let self_employment_tax = social_security_tax + medicare_tax;
        let se_tax_deduction = self_employment_tax * self.config.deduction_factor;

        debug!(
            net_earnings = %net_earnings,
            social_security_tax = %social_security_tax,
            medicare_tax = %medicare_tax,
            self_employment_tax = %self_employment_tax,
            "computed self-employment tax"
        );

        SelfEmploymentTaxResult {
            net_earnings,
            ss_taxable_earnings,
            social_security_tax,
            medicare_tax,
            self_employment_tax,
            se_tax_deduction,
        }
    }

    fn net_earnings(
        &self,
        net_profit: Decimal,
    ) -> Decimal {
        net_profit * self.config.net_earnings_factor
    }

    fn ss_taxable_earnings(
        &self,
        net_earnings: Decimal,
    ) -> Decimal {
        if net_earnings > self.config.ss_wage_base {
            debug!(
                net_earnings = %net_earnings,
                ss_wage_base = %self.config.ss_wage_base,
                "net earnings exceed the social security wage base"
            );
        }
        net_earnings.min(self.config.ss_wage_base)
    }

    /// Medicare on all net earnings plus the additional rate on the part above
    /// the threshold.
    fn medicare_tax(
        &self,
        net_earnings: Decimal,
    ) -> Decimal {
        let mut tax = net_earnings * self.config.medicare_tax_rate;
        if net_earnings > self.config.additional_medicare_threshold {
            tax += (net_earnings - self.config.additional_medicare_threshold)
                * self.config.additional_medicare_rate;
        }
        tax
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;
    use crate::calculations::common::round_half_up;

    /// Initializes tracing subscriber for tests that exercise log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn test_config() -> SelfEmploymentConfig {
        SelfEmploymentConfig {
            net_earnings_factor: dec!(0.9235),
            ss_wage_base: dec!(168600),
            ss_tax_rate: dec!(0.124),
            medicare_tax_rate: dec!(0.029),
            additional_medicare_rate: dec!(0.009),
            additional_medicare_threshold: dec!(200000),
            deduction_factor: dec!(0.50),
        }
    }

    // =========================================================================
    // SelfEmploymentConfig::validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_valid_config() {
        assert_eq!(test_config().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_net_earnings_factor() {
        let config = SelfEmploymentConfig {
            net_earnings_factor: dec!(0.00),
            ..test_config()
        };

        let result = config.validate();

        assert_eq!(
            result,
            Err(SelfEmploymentConfigError::InvalidNetEarningsFactor(dec!(0.00)))
        );
    }

    #[test]
    fn validate_rejects_ss_tax_rate_greater_than_one() {
        let config = SelfEmploymentConfig {
            ss_tax_rate: dec!(12.4),
            ..test_config()
        };

        let result = config.validate();

        assert_eq!(
            result,
            Err(SelfEmploymentConfigError::InvalidSocialSecurityRate(dec!(12.4)))
        );
    }

    #[test]
    fn validate_rejects_negative_medicare_rate() {
        let config = SelfEmploymentConfig {
            medicare_tax_rate: dec!(-0.029),
            ..test_config()
        };

        let result = config.validate();

        assert_eq!(
            result,
            Err(SelfEmploymentConfigError::InvalidMedicareRate(dec!(-0.029)))
        );
    }

    #[test]
    fn validate_rejects_zero_wage_base() {
        let config = SelfEmploymentConfig {
            ss_wage_base: dec!(0),
            ..test_config()
        };

        let result = config.validate();

        assert_eq!(result, Err(SelfEmploymentConfigError::InvalidSsWageBase(dec!(0))));
    }

    #[test]
    fn validate_rejects_negative_additional_threshold() {
        let config = SelfEmploymentConfig {
            additional_medicare_threshold: dec!(-1),
            ..test_config()
        };

        let result = config.validate();

        assert_eq!(
            result,
            Err(SelfEmploymentConfigError::InvalidAdditionalMedicareThreshold(
                dec!(-1)
            ))
        );
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn zero_profit_owes_nothing() {
        let config = test_config();

        let result = SelfEmploymentTax::new(&config).calculate(Decimal::ZERO);

        assert_eq!(result, SelfEmploymentTaxResult::zero());
    }

    #[test]
    fn loss_owes_nothing() {
        let config = test_config();

        let result = SelfEmploymentTax::new(&config).calculate(dec!(-25000));

        assert_eq!(result.self_employment_tax, Decimal::ZERO);
        assert_eq!(result.se_tax_deduction, Decimal::ZERO);
    }

    #[test]
    fn hundred_thousand_profit() {
        let config = test_config();

        let result = SelfEmploymentTax::new(&config).calculate(dec!(100000));

        assert_eq!(result.net_earnings, dec!(92350));
        assert_eq!(result.social_security_tax, dec!(11451.40));
        assert_eq!(result.medicare_tax, dec!(2678.15));
        assert_eq!(result.self_employment_tax, dec!(14129.55));
        assert_eq!(round_half_up(result.se_tax_deduction), dec!(7064.78));
    }

    #[test]
    fn social_security_is_capped_at_wage_base() {
        let _guard = init_test_tracing();
        let config = test_config();

        let result = SelfEmploymentTax::new(&config).calculate(dec!(200000));

        // Net earnings 184,700 exceed the 168,600 base.
        assert_eq!(result.ss_taxable_earnings, dec!(168600));
        assert_eq!(result.social_security_tax, dec!(20906.40));
        assert_eq!(result.medicare_tax, dec!(5356.30));
    }

    #[test]
    fn additional_medicare_applies_above_threshold() {
        let config = test_config();

        let result = SelfEmploymentTax::new(&config).calculate(dec!(300000));

        // Net earnings 277,050: 2.9% on all plus 0.9% on 77,050.
        assert_eq!(result.net_earnings, dec!(277050));
        assert_eq!(result.medicare_tax, dec!(8034.45) + dec!(693.45));
        assert_eq!(result.self_employment_tax, dec!(20906.40) + dec!(8727.90));
    }
}
