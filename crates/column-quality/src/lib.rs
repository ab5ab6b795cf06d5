//! Column Quality Reporter
//!
//! Per-column data quality statistics for tabular data, built on Polars.
//!
//! # Overview
//!
//! For every column of a table the reporter computes:
//!
//! - **Null count / percentage**: missing cells (NaN counts as missing in float columns)
//! - **Zero count / percentage**: cells equal to numeric zero
//! - **Combined null+zero percentage**: the two counts summed, without deduplication
//! - **Type check**: the shared runtime type name of the column's cells, or `"different"`
//!
//! The summary can then be filtered by a percentage threshold and sorted by any
//! summary attribute.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use column_quality::{ColumnQualityReporter, ReportConfig};
//!
//! // Everything, in input column order
//! let summary = column_quality::analyze("data.csv", 0.0, None, false)?;
//! println!("{}", summary);
//!
//! // Columns that are more than 20% null-or-zero, most affected first
//! let config = ReportConfig::builder()
//!     .threshold(20.0)
//!     .sort_column("null_zero_percentage")
//!     .build()?;
//!
//! let report = ColumnQualityReporter::new(config)?.report(df)?;
//! for row in &report.rows {
//!     println!("{}: {:.2}% ({})", row.column_name, row.null_zero_percentage, row.type_check);
//! }
//! ```
//!
//! # Data Sources
//!
//! A [`DataSource`] is either a path to a delimited text file or a Polars
//! `DataFrame`. Loosely typed requests are decoded from JSON with
//! `DataSource::try_from(serde_json::Value)`; unsupported values fail with
//! [`QualityError::InvalidInputType`].

pub mod config;
pub mod error;
pub mod quality;
pub mod reporting;
pub mod source;
pub mod types;
pub mod utils;

use polars::prelude::DataFrame;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, CsvLoadOptions, DEFAULT_NULL_MARKERS, ReportConfig,
    ReportConfigBuilder, ZeroMatching,
};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use quality::ColumnQualityReporter;
pub use reporting::{QualityReport, ReportFormat, ReportWriter};
pub use source::{DataSource, load_delimited};
pub use types::{ColumnQuality, DIFFERENT_TYPES, SummaryField, TypeCheck};

/// Summarize `data` and return the summary table.
///
/// `threshold == 0.0` returns every column in input order. Any other threshold
/// keeps columns whose combined null+zero percentage is strictly greater and
/// sorts them by `sort_column` (default `null_zero_percentage`), descending
/// unless `ascending` is set. A negative threshold therefore keeps every column,
/// sorted.
///
/// # Errors
///
/// - [`QualityError::Load`] if a path cannot be read or parsed
/// - [`QualityError::ColumnNotFound`] if `sort_column` is not a summary attribute
pub fn analyze(
    data: impl Into<DataSource>,
    threshold: f64,
    sort_column: Option<&str>,
    ascending: bool,
) -> QualityResult<DataFrame> {
    let mut builder = ReportConfig::builder()
        .threshold(threshold)
        .ascending(ascending);
    if let Some(column) = sort_column {
        builder = builder.sort_column(column);
    }

    ColumnQualityReporter::new(builder.build()?)?
        .report(data)?
        .to_dataframe()
}
