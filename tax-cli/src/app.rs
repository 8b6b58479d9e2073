//! Command implementations behind `tax-calc`.
//!
//! Each function takes already-parsed arguments and returns the text to
//! print, so the commands can be tested without spawning the binary.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tax_core::{TaxCalculator, TaxInput, TaxTables};
use tax_data::{BracketLoader, TaxTablesLoader};
use tracing::{debug, info};

use crate::report::Summary;

/// How `calculate` prints its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Summary,
}

/// Builds the tables for a run: the built-in 2024 tables or a TOML file,
/// then any bracket overrides on top.
pub fn load_tables(
    tables_path: Option<&Path>,
    brackets_path: Option<&Path>,
) -> Result<TaxTables> {
    let mut tables = match tables_path {
        Some(path) => TaxTablesLoader::from_path(path)
            .with_context(|| format!("Failed to load tax tables: {}", path.display()))?,
        None => {
            debug!("using built-in 2024 tax tables");
            TaxTables::tax_year_2024()
        }
    };

    if let Some(path) = brackets_path {
        let file = File::open(path)
            .with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = BracketLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let replaced = BracketLoader::apply(&mut tables, &records)
            .with_context(|| format!("Failed to apply brackets from: {}", path.display()))?;
        info!(path = %path.display(), replaced, "applied bracket overrides");
    }

    Ok(tables)
}

/// Reads one [`TaxInput`] as JSON from `path`, or from stdin when `path`
/// is `-`.
pub fn read_input(path: &Path) -> Result<TaxInput> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read tax input from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tax input: {}", path.display()))?
    };

    parse_input(&contents)
}

pub fn parse_input(json: &str) -> Result<TaxInput> {
    let input: TaxInput = serde_json::from_str(json).context("Invalid tax input JSON")?;
    input.validate().context("Invalid tax input")?;
    Ok(input)
}

/// Runs one calculation and renders it in `format`.
pub fn calculate(
    tables: &TaxTables,
    input: &TaxInput,
    format: OutputFormat,
) -> Result<String> {
    let calculator = TaxCalculator::new(tables).context("Invalid tax tables")?;
    let result = calculator.calculate(input);
    info!(
        tax_after_credits = %result.tax_after_credits,
        effective_rate = %result.effective_rate,
        "calculated tax"
    );

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&result).context("Failed to serialize tax result")
        }
        OutputFormat::Summary => {
            let schedule = calculator.quarterly_schedule(&result);
            Ok(Summary::new(tables.tax_year, &result, &schedule).to_string())
        }
    }
}

/// Runs every input against the same tables and returns one compact JSON
/// document per input, in input order.
pub fn calculate_batch(
    tables: &TaxTables,
    inputs: &[TaxInput],
) -> Result<Vec<String>> {
    let calculator = TaxCalculator::new(tables).context("Invalid tax tables")?;

    let lines = inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| {
            let result = calculator.calculate(input);
            serde_json::to_string(&result)
                .with_context(|| format!("Failed to serialize result for row {}", idx + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(rows = lines.len(), "calculated batch");

    Ok(lines)
}

/// The active tables as TOML.
pub fn dump_tables(tables: &TaxTables) -> Result<String> {
    TaxTablesLoader::to_toml_string(tables).context("Failed to serialize tax tables")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::{FilingStatus, TaxResult};

    use super::*;

    fn workspace_path(relative: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(relative)
    }

    // -----------------------------------------------------------------------
    // load_tables
    // -----------------------------------------------------------------------

    #[test]
    fn load_tables_defaults_to_built_in_year() {
        let tables = load_tables(None, None).expect("built-in tables");

        assert_eq!(tables, TaxTables::tax_year_2024());
    }

    #[test]
    fn load_tables_reads_toml_and_applies_brackets() {
        let toml = workspace_path("tax-data/data/tax_tables_2024.toml");
        let brackets = workspace_path("tax-data/test-data/brackets_2024_preferential.csv");

        let tables = load_tables(Some(&toml), Some(&brackets)).expect("tables");

        assert_eq!(
            tables.preferential_brackets(FilingStatus::HeadOfHousehold)[0].upper_bound,
            Some(dec!(63000))
        );
    }

    #[test]
    fn load_tables_reports_missing_file() {
        let missing = Path::new("no-such-tables.toml");

        let err = load_tables(Some(missing), None).unwrap_err();

        assert!(format!("{err:#}").contains("no-such-tables.toml"));
    }

    // -----------------------------------------------------------------------
    // parse_input / calculate
    // -----------------------------------------------------------------------

    #[test]
    fn parse_input_accepts_partial_json() {
        let input = parse_input(r#"{"wages": "85000", "filing_status": "HOH", "state": "WA"}"#)
            .expect("valid input");

        assert_eq!(input.wages, dec!(85000));
        assert_eq!(input.filing_status, FilingStatus::HeadOfHousehold);
        assert_eq!(input.children_under_17, 0);
    }

    #[test]
    fn parse_input_rejects_unknown_filing_status() {
        let result = parse_input(r#"{"filing_status": "widowed"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn parse_input_rejects_amounts_that_would_overflow() {
        let json = r#"{"wages": "50000000000000000000000000000", "other_income": "40000000000000000000000000000"}"#;

        let err = parse_input(json).unwrap_err();

        assert!(format!("{err:#}").contains("wages"), "{err:#}");
    }

    #[test]
    fn calculate_json_is_a_tax_result() {
        let tables = TaxTables::tax_year_2024();
        let input = parse_input(r#"{"wages": 64600, "state": "TX"}"#).expect("valid input");

        let json = calculate(&tables, &input, OutputFormat::Json).expect("calculated");
        let result: TaxResult = serde_json::from_str(&json).expect("round trip");

        assert_eq!(result.taxable_income, dec!(50000));
        assert_eq!(result.breakdown_amount("federal_ordinary"), dec!(6053));
    }

    #[test]
    fn calculate_summary_is_plain_text() {
        let tables = TaxTables::tax_year_2024();
        let input = parse_input(r#"{"wages": 64600, "state": "TX"}"#).expect("valid input");

        let summary = calculate(&tables, &input, OutputFormat::Summary).expect("calculated");

        assert!(summary.starts_with("Tax summary for 2024 (TX)"));
    }

    // -----------------------------------------------------------------------
    // calculate_batch / dump_tables
    // -----------------------------------------------------------------------

    #[test]
    fn calculate_batch_returns_one_line_per_input() {
        let tables = TaxTables::tax_year_2024();
        let inputs = vec![
            TaxInput::default(),
            TaxInput {
                wages: dec!(100000),
                state: "TX".to_string(),
                ..TaxInput::default()
            },
        ];

        let lines = calculate_batch(&tables, &inputs).expect("calculated");

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| !line.contains('\n')));
        let second: TaxResult = serde_json::from_str(&lines[1]).expect("round trip");
        assert_eq!(second.total_tax, dec!(13841));
    }

    #[test]
    fn dump_tables_loads_back() {
        let tables = TaxTables::tax_year_2024();

        let toml = dump_tables(&tables).expect("dumped");

        assert_eq!(TaxTablesLoader::from_toml_str(&toml).expect("parsed"), tables);
    }
}
