use polars::prelude::*;
use tracing::{debug, info};

use super::stats::{count_nulls, count_zeros, type_check};
use crate::config::{ReportConfig, ZeroMatching};
use crate::error::{Result, ResultExt};
use crate::reporting::QualityReport;
use crate::source::DataSource;
use crate::types::{ColumnQuality, SummaryField};
use crate::utils::percentage;

/// Computes per-column null/zero statistics and type consistency.
#[derive(Debug, Clone, Default)]
pub struct ColumnQualityReporter {
    config: ReportConfig,
}

static_assertions::assert_impl_all!(ColumnQualityReporter: Send, Sync);

impl ColumnQualityReporter {
    /// Create a reporter, validating the configuration.
    pub fn new(config: ReportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Resolve `source` and build a report on it.
    pub fn report(&self, source: impl Into<DataSource>) -> Result<QualityReport> {
        let source = source.into();
        let df = source.resolve(&self.config.csv)?;
        self.report_frame(&df, source.describe())
    }

    /// Build a report on a table that is already loaded.
    ///
    /// The table is only read.
    pub fn report_frame(&self, df: &DataFrame, source: impl Into<String>) -> Result<QualityReport> {
        let rows = Self::summarize(df, self.config.zero_matching)?;
        let total_columns = rows.len();
        let rows = Self::filter_and_sort(rows, &self.config)?;

        info!(
            "Quality summary: {} of {} columns reported ({} rows)",
            rows.len(),
            total_columns,
            df.height()
        );

        Ok(QualityReport::new(
            source.into(),
            df.height(),
            total_columns,
            &self.config,
            rows,
        ))
    }

    /// One summary row per column, in input column order.
    pub fn summarize(df: &DataFrame, zero_matching: ZeroMatching) -> Result<Vec<ColumnQuality>> {
        let total_rows = df.height();
        df.get_columns()
            .iter()
            .map(|column| Self::summarize_column(column, total_rows, zero_matching))
            .collect()
    }

    /// Summary row for a single column of a table with `total_rows` rows.
    pub fn summarize_column(
        column: &Column,
        total_rows: usize,
        zero_matching: ZeroMatching,
    ) -> Result<ColumnQuality> {
        let series = column.as_materialized_series();
        let name = series.name().to_string();

        let null_count =
            count_nulls(series).context(format!("Counting nulls in column '{}'", name))?;
        let zero_count = count_zeros(series, zero_matching)
            .context(format!("Counting zeros in column '{}'", name))?;
        let type_check = type_check(series)
            .context(format!("Checking types in column '{}'", name))?;

        debug!(
            "Column '{}': {} nulls, {} zeros, type {}",
            name, null_count, zero_count, type_check
        );

        Ok(ColumnQuality {
            column_name: name,
            null_zero_percentage: percentage(null_count + zero_count, total_rows),
            null_count,
            null_percentage: percentage(null_count, total_rows),
            zero_count,
            zero_percentage: percentage(zero_count, total_rows),
            type_check,
            row_count: total_rows,
        })
    }

    /// Apply the threshold filter and sort.
    ///
    /// A threshold of exactly `0` returns `rows` untouched. Otherwise rows whose
    /// combined percentage is strictly above the threshold are kept and sorted
    /// (stably) by `config.sort_column`.
    pub fn filter_and_sort(
        mut rows: Vec<ColumnQuality>,
        config: &ReportConfig,
    ) -> Result<Vec<ColumnQuality>> {
        if config.is_unfiltered() {
            return Ok(rows);
        }

        rows.retain(|row| row.null_zero_percentage > config.threshold);

        let field: SummaryField = config.sort_column.parse()?;
        rows.sort_by(|a, b| {
            let ordering = a.compare_by(b, field);
            if config.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });

        Ok(rows)
    }
}
