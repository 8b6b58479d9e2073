//! Deterministic tax-liability engine.
//!
//! Given one [`TaxInput`] and one [`TaxTables`], [`TaxCalculator`] produces a
//! [`TaxResult`]: federal tax on ordinary and preferential income,
//! self-employment tax, the net investment income tax, a flat-rate state tax,
//! nonrefundable credits and the resulting liability. Every calculator is a
//! pure function of its arguments and the tables, so one set of tables can
//! serve any number of concurrent computations.

pub mod calculations;
pub mod models;

pub use calculations::TaxCalculator;
pub use models::*;
