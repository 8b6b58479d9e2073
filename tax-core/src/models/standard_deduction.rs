use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeduction {
    pub amount: Decimal,
    /// Added once per taxpayer (and spouse, when filing jointly) aged 65+.
    pub age_65_addon: Decimal,
}

impl StandardDeduction {
    pub fn new(
        amount: Decimal,
        age_65_addon: Decimal,
    ) -> Self {
        Self {
            amount,
            age_65_addon,
        }
    }
}
