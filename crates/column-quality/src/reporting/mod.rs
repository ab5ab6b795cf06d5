//! Report module.
//!
//! [`QualityReport`] holds the summary rows together with the metadata of the
//! run. It converts to a polars `DataFrame` with the fixed summary column
//! order and can be written to disk with [`ReportWriter`].
//!
//! # Example
//!
//! ```rust,ignore
//! use column_quality::{ColumnQualityReporter, ReportConfig, ReportFormat, ReportWriter};
//!
//! let reporter = ColumnQualityReporter::new(ReportConfig::builder().threshold(20.0).build()?)?;
//! let report = reporter.report("data/train.csv")?;
//!
//! println!("{}", report.to_dataframe()?);
//!
//! let writer = ReportWriter::new(PathBuf::from("outputs"));
//! writer.write(&report, "train", ReportFormat::Csv)?;
//! ```

mod generator;

pub use generator::{QualityReport, ReportFormat, ReportWriter};
