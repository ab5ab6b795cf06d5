//! Configuration types for the column quality reporter.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic report setup.

use serde::{Deserialize, Serialize};

use crate::types::SummaryField;

/// Which cells count as "zero".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ZeroMatching {
    /// Only integer and float cells equal to numeric zero
    #[default]
    Numeric,
    /// Numeric zeros plus boolean `false` cells
    IncludeFalse,
}

/// Missing-value markers recognised when loading delimited files.
pub const DEFAULT_NULL_MARKERS: [&str; 9] =
    ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// Options for loading a delimited text file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvLoadOptions {
    /// Field separator byte.
    /// Default: b','
    pub separator: u8,

    /// Cell values read as missing.
    /// Default: [`DEFAULT_NULL_MARKERS`]
    pub null_markers: Vec<String>,

    /// Number of rows used for schema inference. `None` scans the whole file.
    /// Default: Some(1000). A failed read is retried with a full scan.
    pub infer_schema_length: Option<usize>,
}

impl Default for CsvLoadOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|m| m.to_string()).collect(),
            infer_schema_length: Some(1000),
        }
    }
}

/// Configuration for a quality report.
///
/// Use [`ReportConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use column_quality::config::{ReportConfig, ZeroMatching};
///
/// let config = ReportConfig::builder()
///     .threshold(20.0)
///     .sort_column("null_count")
///     .ascending(true)
///     .zero_matching(ZeroMatching::IncludeFalse)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Percentage cutoff for the combined null+zero percentage.
    /// `0.0` returns every column, unfiltered and unsorted.
    /// Default: 0.0
    pub threshold: f64,

    /// Summary attribute used to sort filtered rows.
    /// Default: "null_zero_percentage"
    pub sort_column: String,

    /// Sort direction.
    /// Default: false (descending)
    pub ascending: bool,

    /// Which cells count as zero.
    /// Default: Numeric
    pub zero_matching: ZeroMatching,

    /// Options used when the data source is a file path.
    pub csv: CsvLoadOptions,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            sort_column: SummaryField::NullZeroPercentage.name().to_string(),
            ascending: false,
            zero_matching: ZeroMatching::default(),
            csv: CsvLoadOptions::default(),
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Whether the threshold is the "return everything" sentinel.
    pub fn is_unfiltered(&self) -> bool {
        self.threshold == 0.0
    }

    /// Validate the configuration and return errors if invalid.
    ///
    /// The threshold is not checked: any value other than `0` filters on
    /// `combined > threshold`, so a negative one keeps every column and NaN
    /// keeps none. The sort column is checked later, by the sort step, so an
    /// unknown name is accepted when the threshold is `0`.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.csv.separator == b'"' || self.csv.separator == b'\n' {
            return Err(ConfigValidationError::InvalidSeparator(
                self.csv.separator as char,
            ));
        }

        if self.csv.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidInferSchemaLength);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid separator: {0:?}")]
    InvalidSeparator(char),

    #[error("Invalid schema inference length: 0 (use None to scan the whole file)")]
    InvalidInferSchemaLength,
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    threshold: Option<f64>,
    sort_column: Option<String>,
    ascending: Option<bool>,
    zero_matching: Option<ZeroMatching>,
    separator: Option<u8>,
    null_markers: Option<Vec<String>>,
    infer_schema_length: Option<Option<usize>>,
}

impl ReportConfigBuilder {
    /// Set the combined null+zero percentage cutoff.
    ///
    /// # Arguments
    /// * `threshold` - Percentage between 0 and 100 (e.g., 20.0 = 20%).
    ///   `0.0` disables filtering and sorting.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the summary attribute to sort by.
    pub fn sort_column(mut self, column: impl Into<String>) -> Self {
        self.sort_column = Some(column.into());
        self
    }

    /// Sort ascending instead of descending.
    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = Some(ascending);
        self
    }

    /// Set which cells count as zero.
    pub fn zero_matching(mut self, matching: ZeroMatching) -> Self {
        self.zero_matching = Some(matching);
        self
    }

    /// Set the field separator for delimited files.
    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Replace the missing-value markers used when loading files.
    pub fn null_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    /// Set the number of rows used for schema inference.
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ReportConfig` or an error if validation fails.
    pub fn build(self) -> Result<ReportConfig, ConfigValidationError> {
        let defaults = CsvLoadOptions::default();
        let config = ReportConfig {
            threshold: self.threshold.unwrap_or(0.0),
            sort_column: self
                .sort_column
                .unwrap_or_else(|| SummaryField::NullZeroPercentage.name().to_string()),
            ascending: self.ascending.unwrap_or(false),
            zero_matching: self.zero_matching.unwrap_or_default(),
            csv: CsvLoadOptions {
                separator: self.separator.unwrap_or(defaults.separator),
                null_markers: self.null_markers.unwrap_or(defaults.null_markers),
                infer_schema_length: self
                    .infer_schema_length
                    .unwrap_or(defaults.infer_schema_length),
            },
        };

        config.validate()?;
        Ok(config)
    }
}
