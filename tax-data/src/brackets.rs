use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{FilingStatus, TaxBracket, TaxTables, TaxTablesError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule: {0} (expected 'ordinary' or 'preferential')")]
    InvalidSchedule(String),

    #[error("Invalid filing status: {0}")]
    InvalidFilingStatus(String),

    #[error("Bracket file is for tax year {found} but the tables are for {expected}")]
    TaxYearMismatch { expected: i32, found: i32 },

    #[error("Brackets produce invalid tables: {0}")]
    InvalidTables(#[from] TaxTablesError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// Which rate schedule a bracket row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScheduleKind {
    Ordinary,
    Preferential,
}

impl ScheduleKind {
    fn parse(schedule: &str) -> Result<Self, BracketLoaderError> {
        match schedule.trim().to_ascii_lowercase().as_str() {
            "ordinary" => Ok(Self::Ordinary),
            "preferential" => Ok(Self::Preferential),
            _ => Err(BracketLoaderError::InvalidSchedule(schedule.to_string())),
        }
    }
}

/// A single record from the tax brackets CSV file.
///
/// - `tax_year`: The tax year (e.g., 2024)
/// - `schedule`: `ordinary` or `preferential`
/// - `filing_status`: A filing status code (`S`, `MFJ`, ...) or name (`married_joint`, ...)
/// - `upper_bound`: The inclusive top of this bracket (empty for unlimited)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub filing_status: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket schedules from CSV files.
///
/// Rows are grouped by (schedule, filing status). Each group replaces the
/// whole schedule for that status; schedules not mentioned in the file are
/// left untouched. Rows within a group must already be in ascending order.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Replace bracket schedules in `tables` with the ones in `records`.
    ///
    /// The replacement is all-or-nothing: the updated tables are validated
    /// before `tables` is touched, so on error `tables` is unchanged.
    ///
    /// Returns the number of schedules replaced.
    pub fn apply(
        tables: &mut TaxTables,
        records: &[BracketRecord],
    ) -> Result<usize, BracketLoaderError> {
        let mut groups: BTreeMap<(ScheduleKind, FilingStatus), Vec<TaxBracket>> = BTreeMap::new();

        for record in records {
            if record.tax_year != tables.tax_year {
                return Err(BracketLoaderError::TaxYearMismatch {
                    expected: tables.tax_year,
                    found: record.tax_year,
                });
            }
            let kind = ScheduleKind::parse(&record.schedule)?;
            let status = FilingStatus::parse(&record.filing_status)
                .ok_or_else(|| BracketLoaderError::InvalidFilingStatus(record.filing_status.clone()))?;

            groups.entry((kind, status)).or_default().push(TaxBracket {
                upper_bound: record.upper_bound,
                rate: record.rate,
            });
        }

        let mut updated = tables.clone();
        let replaced = groups.len();
        for ((kind, status), brackets) in groups {
            debug!(schedule = ?kind, filing_status = %status, brackets = brackets.len(), "replacing schedule");
            match kind {
                ScheduleKind::Ordinary => updated.ordinary_brackets.set(status, brackets),
                ScheduleKind::Preferential => updated.preferential_brackets.set(status, brackets),
            }
        }
        updated.validate()?;

        *tables = updated;
        info!(replaced, "applied bracket schedules");

        Ok(replaced)
    }
}
