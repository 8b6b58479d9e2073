use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One slice of a progressive rate schedule.
///
/// Brackets are stored in ascending order. Each bracket starts where the
/// previous one ends (the first starts at zero) and runs up to and including
/// `upper_bound`. The last bracket of a schedule has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    /// The open-ended top bracket.
    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}
