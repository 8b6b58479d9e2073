//! Flat-rate state income tax.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxConfig {
    /// Rate applied to any state code missing from `rates`.
    pub fallback_rate: Decimal,
    /// Flat rate per uppercase two-letter state code.
    pub rates: BTreeMap<String, Decimal>,
}

/// Trimmed, uppercase form of a state code as supplied by the caller.
pub fn normalize_state_code(state: &str) -> String {
    state.trim().to_ascii_uppercase()
}

impl StateTaxConfig {
    /// Looks up the rate for a state code, case-insensitively.
    pub fn rate_for(
        &self,
        state: &str,
    ) -> Decimal {
        let code = normalize_state_code(state);
        match self.rates.get(&code) {
            Some(rate) => *rate,
            None => {
                debug!(state = %code, fallback_rate = %self.fallback_rate, "unknown state code; using fallback rate");
                self.fallback_rate
            }
        }
    }

    /// Taxable income times the state's flat rate.
    pub fn state_tax(
        &self,
        taxable_income: Decimal,
        state: &str,
    ) -> Decimal {
        taxable_income * self.rate_for(state)
    }
}
