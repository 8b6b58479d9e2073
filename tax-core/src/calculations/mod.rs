//! Tax calculators and the pipeline that sequences them.
//!
//! Each calculator is a pure function of its arguments and the slice of
//! [`TaxTables`](crate::TaxTables) it needs, so it can be exercised on its own
//! without building a full [`TaxInput`](crate::TaxInput).

pub mod brackets;
pub mod common;
pub mod credits;
pub mod deductions;
pub mod niit;
pub mod pipeline;
pub mod preferential;
pub mod quarterly;
pub mod self_emp;
pub mod state;

pub use brackets::{BracketTax, progressive_tax};
pub use credits::{CreditCalculator, CreditConfig, CreditResult};
pub use deductions::{DeductionChoice, DeductionSelector, ItemizableExpenses, ItemizedDeductionConfig};
pub use niit::{NiitConfig, net_investment_income_tax};
pub use pipeline::TaxCalculator;
pub use preferential::preferential_tax;
pub use quarterly::{QuarterlyPayment, payment_schedule, quarterly_schedule};
pub use self_emp::{
    SelfEmploymentConfig, SelfEmploymentConfigError, SelfEmploymentTax, SelfEmploymentTaxResult,
};
pub use state::{StateTaxConfig, normalize_state_code};
