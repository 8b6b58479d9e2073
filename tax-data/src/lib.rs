//! Loaders that turn files into `tax-core` values.
//!
//! - [`TaxTablesLoader`] reads and writes whole [`TaxTables`](tax_core::TaxTables)
//!   as TOML.
//! - [`BracketLoader`] replaces individual bracket schedules from a CSV file.
//! - [`load_inputs_from_str`] reads a batch of
//!   [`TaxInput`](tax_core::TaxInput)s from CSV, one taxpayer-year per row.
//!
//! Every table that leaves this crate has passed
//! [`TaxTables::validate`](tax_core::TaxTables::validate).

pub mod brackets;
pub mod inputs;
pub mod tables;

pub use brackets::{BracketLoader, BracketLoaderError, BracketRecord, ScheduleKind};
pub use inputs::{InputLoadError, load_inputs_from_file, load_inputs_from_str};
pub use tables::{TablesLoadError, TaxTablesLoader};
