//! Runs the command functions against on-disk fixture files, the way the
//! `tax-calc` binary does.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_cli::app::{self, OutputFormat};
use tax_core::{DeductionType, TaxResult};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn workspace_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(relative)
}

#[test]
fn test_calculate_fixture_as_json() {
    let tables = app::load_tables(None, None).unwrap();
    let input = app::read_input(&fixture_path("self_employed_couple_ca.json")).unwrap();

    let json = app::calculate(&tables, &input, OutputFormat::Json).unwrap();
    let result: TaxResult = serde_json::from_str(&json).unwrap();

    assert_eq!(result.state, "CA");
    assert_eq!(result.se_tax, dec!(27879.65));
    assert_eq!(result.agi, dec!(263410.18));
    assert_eq!(result.deduction_type, DeductionType::Standard);
    assert_eq!(result.taxable_income, dec!(234210.18));
    assert_eq!(result.child_tax_credit, dec!(4000));
}

#[test]
fn test_calculate_fixture_as_summary() {
    let tables = app::load_tables(None, None).unwrap();
    let input = app::read_input(&fixture_path("self_employed_couple_ca.json")).unwrap();

    let summary = app::calculate(&tables, &input, OutputFormat::Summary).unwrap();

    assert!(summary.contains("Self-employment tax"));
    assert!(summary.contains("$27,879.65"));
    assert!(summary.contains("State tax (CA)"));
    assert!(summary.contains("24.0%"));
}

#[test]
fn test_shipped_tables_give_same_results_as_built_in() {
    let built_in = app::load_tables(None, None).unwrap();
    let shipped =
        app::load_tables(Some(&workspace_path("tax-data/data/tax_tables_2024.toml")), None)
            .unwrap();
    let input = app::read_input(&fixture_path("self_employed_couple_ca.json")).unwrap();

    let expected = app::calculate(&built_in, &input, OutputFormat::Json).unwrap();
    let actual = app::calculate(&shipped, &input, OutputFormat::Json).unwrap();

    assert_eq!(actual, expected);
}

#[test]
fn test_batch_file_produces_json_lines() {
    let tables = app::load_tables(None, None).unwrap();
    let inputs =
        tax_data::load_inputs_from_file(&workspace_path("tax-data/test-data/inputs_batch.csv"))
            .unwrap();

    let lines = app::calculate_batch(&tables, &inputs).unwrap();

    assert_eq!(lines.len(), 5);
    let first: TaxResult = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(first.total_tax, dec!(13841));
}
