use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::config::ReportConfig;
use crate::error::Result;
use crate::types::{ColumnQuality, SummaryField};

// ============================================================================
// Report Types
// ============================================================================

/// Summary rows of one run plus the settings that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path of the input file, or a description of the in-memory table
    pub source: String,
    /// Row count of the input table
    pub total_rows: usize,
    /// Column count of the input table (before filtering)
    pub total_columns: usize,
    /// Combined null+zero percentage cutoff (0 = unfiltered)
    pub threshold: f64,
    /// Attribute the rows are sorted by (ignored when unfiltered)
    pub sort_column: String,
    pub ascending: bool,
    /// Summary rows, filtered and sorted
    pub rows: Vec<ColumnQuality>,
}

static_assertions::assert_impl_all!(QualityReport: Send, Sync);

impl QualityReport {
    pub fn new(
        source: String,
        total_rows: usize,
        total_columns: usize,
        config: &ReportConfig,
        rows: Vec<ColumnQuality>,
    ) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source,
            total_rows,
            total_columns,
            threshold: config.threshold,
            sort_column: config.sort_column.clone(),
            ascending: config.ascending,
            rows,
        }
    }

    /// Names of the columns present in the result.
    pub fn flagged_columns(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.column_name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Summary table, one row per reported column, columns in fixed order.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let rows = &self.rows;
        let df = df!(
            SummaryField::ColumnName.name() => rows.iter().map(|r| r.column_name.as_str()).collect::<Vec<_>>(),
            SummaryField::NullZeroPercentage.name() => rows.iter().map(|r| r.null_zero_percentage).collect::<Vec<_>>(),
            SummaryField::NullCount.name() => rows.iter().map(|r| r.null_count as u64).collect::<Vec<_>>(),
            SummaryField::NullPercentage.name() => rows.iter().map(|r| r.null_percentage).collect::<Vec<_>>(),
            SummaryField::ZeroCount.name() => rows.iter().map(|r| r.zero_count as u64).collect::<Vec<_>>(),
            SummaryField::ZeroPercentage.name() => rows.iter().map(|r| r.zero_percentage).collect::<Vec<_>>(),
            SummaryField::TypeCheck.name() => rows.iter().map(|r| r.type_check.as_str()).collect::<Vec<_>>(),
            SummaryField::RowCount.name() => rows.iter().map(|r| r.row_count as u64).collect::<Vec<_>>(),
        )?;
        Ok(df)
    }
}

// ============================================================================
// Report Writer
// ============================================================================

/// On-disk format of a written report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReportFormat {
    /// The summary table as CSV
    #[default]
    Csv,
    /// The full report (metadata + rows) as pretty JSON
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Writes reports into an output directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write `report` as `<base_name>_quality.<ext>` and return the path.
    ///
    /// The output directory is created if needed.
    pub fn write(
        &self,
        report: &QualityReport,
        base_name: &str,
        format: ReportFormat,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_quality.{}", base_name, format.extension()));
        let mut file = File::create(&report_path)?;

        match format {
            ReportFormat::Csv => {
                let mut df = report.to_dataframe()?;
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .with_separator(b',')
                    .with_quote_char(b'"')
                    .finish(&mut df)?;
            }
            ReportFormat::Json => {
                file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;
            }
        }

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
