mod filing_status;
mod standard_deduction;
mod tax_bracket;
mod tax_input;
mod tax_result;
mod tax_tables;

pub use filing_status::{FilingStatus, FilingStatusTable};
pub use standard_deduction::StandardDeduction;
pub use tax_bracket::TaxBracket;
pub use tax_input::{MAX_INPUT_AMOUNT, TaxInput, TaxInputError};
pub use tax_result::{
    BREAKDOWN_CREDITS_APPLIED, BREAKDOWN_FEDERAL_LTCG, BREAKDOWN_FEDERAL_ORDINARY,
    BREAKDOWN_NIIT, BREAKDOWN_SE_TAX, BREAKDOWN_STATE_TAX, DeductionType, TaxResult,
};
pub use tax_tables::{MAX_TAX_YEAR, MIN_TAX_YEAR, TaxTables, TaxTablesError};
