//! CSV loader for batches of [`TaxInput`]s.
//!
//! ## CSV Format
//!
//! One row per taxpayer-year. Headers are matched by name, so column order
//! does not matter, and any column may be left out entirely or left empty in
//! a given row.
//!
//! | Column | Type | Default |
//! |--------|------|---------|
//! | `filing_status` | string | `single` |
//! | `state` | string | `CA` |
//! | `wages`, `self_employment`, `interest`, `dividends_qualified`, `dividends_ordinary`, `short_term_gains`, `long_term_gains`, `rental_income`, `k1_income`, `other_income` | decimal | `0` |
//! | `mortgage_interest`, `property_tax`, `state_tax_paid`, `charitable`, `medical` | decimal | `0` |
//! | `traditional_401k`, `traditional_ira`, `hsa`, `education_expenses` | decimal | `0` |
//! | `children_under_17`, `children_17_plus` | integer | `0` |
//! | `age_65_plus`, `spouse_age_65_plus` | `true` / `false` | `false` |
//!
//! `filing_status` accepts the codes `S`, `MFJ`, `MFS`, `HOH`, `QSS` as well
//! as the snake-case names (`married_joint`, ...), case-insensitively.
//!
//! ### Example
//!
//! ```csv
//! filing_status,state,wages,long_term_gains,children_under_17
//! S,TX,85000,,
//! MFJ,CA,180000,12000,2
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{FilingStatus, TaxInput, TaxInputError};
use tracing::debug;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    filing_status: Option<String>,
    state: Option<String>,
    wages: Option<Decimal>,
    self_employment: Option<Decimal>,
    interest: Option<Decimal>,
    dividends_qualified: Option<Decimal>,
    dividends_ordinary: Option<Decimal>,
    short_term_gains: Option<Decimal>,
    long_term_gains: Option<Decimal>,
    rental_income: Option<Decimal>,
    k1_income: Option<Decimal>,
    other_income: Option<Decimal>,
    mortgage_interest: Option<Decimal>,
    property_tax: Option<Decimal>,
    state_tax_paid: Option<Decimal>,
    charitable: Option<Decimal>,
    medical: Option<Decimal>,
    traditional_401k: Option<Decimal>,
    traditional_ira: Option<Decimal>,
    hsa: Option<Decimal>,
    children_under_17: Option<u32>,
    children_17_plus: Option<u32>,
    education_expenses: Option<Decimal>,
    age_65_plus: Option<bool>,
    spouse_age_65_plus: Option<bool>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum InputLoadError {
    /// The underlying CSV deserialisation failed (bad structure, type
    /// mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `filing_status` cell contained a value that is not a recognised
    /// code or name. `row` is 1-based, counting the first data row as 1.
    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    /// An amount on row `row` is too large to compute with.
    #[error("row {row}: {source}")]
    InvalidAmount {
        row: usize,
        #[source]
        source: TaxInputError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxInput, InputLoadError> {
    let defaults = TaxInput::default();

    let filing_status = match row.filing_status.as_deref().map(str::trim) {
        None | Some("") => defaults.filing_status,
        Some(value) => {
            FilingStatus::parse(value).ok_or_else(|| InputLoadError::InvalidFilingStatus {
                status: value.to_string(),
                row: row_number,
            })?
        }
    };
    let state = match row.state {
        Some(state) if !state.trim().is_empty() => state.trim().to_string(),
        _ => defaults.state,
    };

    let input = TaxInput {
        wages: row.wages.unwrap_or_default(),
        self_employment: row.self_employment.unwrap_or_default(),
        interest: row.interest.unwrap_or_default(),
        dividends_qualified: row.dividends_qualified.unwrap_or_default(),
        dividends_ordinary: row.dividends_ordinary.unwrap_or_default(),
        short_term_gains: row.short_term_gains.unwrap_or_default(),
        long_term_gains: row.long_term_gains.unwrap_or_default(),
        rental_income: row.rental_income.unwrap_or_default(),
        k1_income: row.k1_income.unwrap_or_default(),
        other_income: row.other_income.unwrap_or_default(),
        mortgage_interest: row.mortgage_interest.unwrap_or_default(),
        property_tax: row.property_tax.unwrap_or_default(),
        state_tax_paid: row.state_tax_paid.unwrap_or_default(),
        charitable: row.charitable.unwrap_or_default(),
        medical: row.medical.unwrap_or_default(),
        traditional_401k: row.traditional_401k.unwrap_or_default(),
        traditional_ira: row.traditional_ira.unwrap_or_default(),
        hsa: row.hsa.unwrap_or_default(),
        children_under_17: row.children_under_17.unwrap_or_default(),
        children_17_plus: row.children_17_plus.unwrap_or_default(),
        education_expenses: row.education_expenses.unwrap_or_default(),
        filing_status,
        state,
        age_65_plus: row.age_65_plus.unwrap_or_default(),
        spouse_age_65_plus: row.spouse_age_65_plus.unwrap_or_default(),
    };
    input.validate().map_err(|source| InputLoadError::InvalidAmount {
        row: row_number,
        source,
    })?;

    Ok(input)
}

/// Parse CSV text and return one [`TaxInput`] per data row, in file order.
///
/// # Errors
///
/// * [`InputLoadError::Parse`] if the CSV is structurally invalid or a cell
///   cannot be deserialised.
/// * [`InputLoadError::InvalidFilingStatus`] if any row contains an
///   unrecognised filing status.
/// * [`InputLoadError::InvalidAmount`] if any amount exceeds
///   [`tax_core::MAX_INPUT_AMOUNT`] in magnitude.
pub fn load_inputs_from_str(input: &str) -> Result<Vec<TaxInput>, InputLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let inputs = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(rows = inputs.len(), "parsed tax input rows");

    Ok(inputs)
}

/// Read a file from disk and delegate to [`load_inputs_from_str`].
pub fn load_inputs_from_file(path: &Path) -> Result<Vec<TaxInput>, InputLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_inputs_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
