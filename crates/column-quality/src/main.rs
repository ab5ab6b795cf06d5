//! CLI entry point for the column quality reporter.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use column_quality::{
    ColumnQualityReporter, QualityReport, ReportConfig, ReportFormat, ReportWriter, SummaryField,
    ZeroMatching,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// CLI-compatible zero matching enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliZeroMatching {
    /// Only numeric cells equal to zero
    Numeric,
    /// Numeric zeros and boolean false
    IncludeFalse,
}

impl From<CliZeroMatching> for ZeroMatching {
    fn from(cli: CliZeroMatching) -> Self {
        match cli {
            CliZeroMatching::Numeric => ZeroMatching::Numeric,
            CliZeroMatching::IncludeFalse => ZeroMatching::IncludeFalse,
        }
    }
}

/// CLI-compatible report format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReportFormat {
    /// Summary table as CSV
    Csv,
    /// Full report as JSON
    Json,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(cli: CliReportFormat) -> Self {
        match cli {
            CliReportFormat::Csv => ReportFormat::Csv,
            CliReportFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Per-column null, zero and type-consistency report",
    long_about = "Reports, for every column of a delimited file, how many cells are missing \
                  or zero and whether all cells share one type.\n\n\
                  EXAMPLES:\n  \
                  # Every column, in file order\n  \
                  column-quality -i data.csv\n\n  \
                  # Columns more than 20% null-or-zero, most affected first\n  \
                  column-quality -i data.csv -t 20\n\n  \
                  # Sort by null count, ascending, and save a CSV report\n  \
                  column-quality -i data.csv -t 5 -s null_count --ascending -o reports/"
)]
struct Args {
    /// Path to the delimited file to analyze
    #[arg(short, long)]
    input: PathBuf,

    /// Combined null+zero percentage cutoff; 0 reports every column unsorted
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    threshold: f64,

    /// Summary attribute to sort by
    #[arg(short, long, default_value = "null_zero_percentage")]
    sort_by: String,

    /// Sort ascending instead of descending
    #[arg(long)]
    ascending: bool,

    /// Which cells count as zero
    #[arg(long, value_enum, default_value = "numeric")]
    zero_matching: CliZeroMatching,

    /// Field separator of the input file
    #[arg(long, default_value = ",")]
    separator: char,

    /// Output directory for the written report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format of the written report
    #[arg(long, value_enum, default_value = "csv")]
    format: CliReportFormat,

    /// Print the report as JSON to stdout instead of a table
    ///
    /// Disables all logging so stdout only contains JSON.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled entirely.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let separator = u8::try_from(args.separator)
        .map_err(|_| anyhow!("Separator must be a single-byte character: {:?}", args.separator))?;

    let config = ReportConfig::builder()
        .threshold(args.threshold)
        .sort_column(&args.sort_by)
        .ascending(args.ascending)
        .zero_matching(args.zero_matching.into())
        .separator(separator)
        .build()?;

    let reporter = ColumnQualityReporter::new(config)?;
    let report = match reporter.report(args.input.as_path()) {
        Ok(report) => report,
        Err(e) => {
            error!("Quality report failed: {}", e);
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report)?;
    }

    if let Some(ref output) = args.output {
        let writer = ReportWriter::new(output.clone());
        let path = writer.write(&report, &extract_file_stem(&args.input), args.format.into())?;
        info!("Report written to: {}", path.display());
    }

    Ok(())
}

/// Print the summary table to stdout.
///
/// Uses `println!` rather than logging: the table is the program's output.
fn print_summary(report: &QualityReport) -> Result<()> {
    println!(
        "Input: {} ({} rows x {} columns)",
        report.source, report.total_rows, report.total_columns
    );

    if report.threshold == 0.0 {
        println!("All columns:");
    } else {
        println!(
            "Columns with {} > {}% (sorted by {}, {}):",
            SummaryField::NullZeroPercentage,
            report.threshold,
            report.sort_column,
            if report.ascending { "ascending" } else { "descending" }
        );
    }

    if report.is_empty() {
        println!("  none");
    } else {
        println!("{}", report.to_dataframe()?);
    }

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
