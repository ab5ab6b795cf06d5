//! Column quality analysis module.
//!
//! This module computes, for every column of a table, how many cells are
//! missing or zero and whether all cells share one runtime type.

mod analyzer;
mod stats;

pub use analyzer::ColumnQualityReporter;
