//! Data source resolution.
//!
//! A report can be computed from a delimited file on disk or from a table that
//! is already in memory. Loosely typed requests (for example JSON coming from a
//! frontend) are decoded with [`DataSource::try_from`], which is where an
//! unsupported input type is rejected.

use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use serde_json::Value;
use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::CsvLoadOptions;
use crate::error::{QualityError, Result};
use crate::utils::dtype_name;

/// Where the table to report on comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Path to a delimited text file with a header row.
    Path(PathBuf),
    /// An already-loaded table.
    Frame(DataFrame),
}

impl DataSource {
    /// Short human-readable description, used in reports and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Frame(df) => format!("<in-memory table {}x{}>", df.height(), df.width()),
        }
    }

    /// Resolve to a table. Paths are loaded; tables are borrowed as-is.
    pub fn resolve(&self, options: &CsvLoadOptions) -> Result<Cow<'_, DataFrame>> {
        match self {
            Self::Path(path) => load_delimited(path, options).map(Cow::Owned),
            Self::Frame(df) => Ok(Cow::Borrowed(df)),
        }
    }
}

impl From<DataFrame> for DataSource {
    fn from(df: DataFrame) -> Self {
        Self::Frame(df)
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for DataSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for DataSource {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

/// Decode a loosely typed request.
///
/// - a string is a file path
/// - an object mapping column names to arrays of scalars is an in-memory table
///
/// Anything else is an [`QualityError::InvalidInputType`].
///
/// A column whose cells are all one JSON kind (nulls aside) becomes a plain
/// typed column; integers mixed with floats widen to `f64`. A column mixing
/// other kinds keeps every cell's own type in a tagged-variant struct column.
impl TryFrom<Value> for DataSource {
    type Error = QualityError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(path) => Ok(Self::Path(PathBuf::from(path))),
            Value::Object(columns) => {
                let mut frame_columns = Vec::with_capacity(columns.len());
                for (name, cells) in columns {
                    let Value::Array(cells) = cells else {
                        return Err(QualityError::InvalidInputType(format!(
                            "object whose column '{}' is {}",
                            name,
                            json_kind(&cells)
                        )));
                    };
                    frame_columns.push(decode_column(&name, &cells)?);
                }
                Ok(Self::Frame(DataFrame::new(frame_columns)?))
            }
            other => Err(QualityError::InvalidInputType(json_kind(&other).to_string())),
        }
    }
}

/// Runtime kind of a non-null decoded cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Str,
    Bool,
}

impl CellKind {
    fn of(value: &AnyValue<'_>) -> Option<Self> {
        match value {
            AnyValue::Int64(_) => Some(Self::Int),
            AnyValue::Float64(_) => Some(Self::Float),
            AnyValue::StringOwned(_) | AnyValue::String(_) => Some(Self::Str),
            AnyValue::Boolean(_) => Some(Self::Bool),
            _ => None,
        }
    }

    fn dtype(self) -> DataType {
        match self {
            Self::Int => DataType::Int64,
            Self::Float => DataType::Float64,
            Self::Str => DataType::String,
            Self::Bool => DataType::Boolean,
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

fn decode_column(name: &str, cells: &[Value]) -> Result<Column> {
    let values = cells
        .iter()
        .map(|cell| json_cell(name, cell))
        .collect::<Result<Vec<_>>>()?;

    let mut kinds: Vec<CellKind> = Vec::new();
    for kind in values.iter().filter_map(CellKind::of) {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    if kinds.len() <= 1 || kinds.iter().all(|kind| kind.is_numeric()) {
        let series = Series::from_any_values(name.into(), &values, false)?;
        return Ok(series.into_column());
    }

    debug!(
        "Column '{}' mixes {} cell kinds, keeping them tagged",
        name,
        kinds.len()
    );
    tagged_column(name, &values, &kinds)
}

/// Build a tagged-variant column: a struct with one field per cell kind,
/// named after that kind's dtype. Each row holds its value in the field of its
/// own kind and null everywhere else; a missing cell is null in every field.
fn tagged_column(name: &str, values: &[AnyValue<'static>], kinds: &[CellKind]) -> Result<Column> {
    let fields = kinds
        .iter()
        .map(|&kind| {
            let dtype = kind.dtype();
            let cells: Vec<AnyValue<'static>> = values
                .iter()
                .map(|value| {
                    if CellKind::of(value) == Some(kind) {
                        value.clone()
                    } else {
                        AnyValue::Null
                    }
                })
                .collect();
            Series::from_any_values_and_dtype(dtype_name(&dtype).into(), &cells, &dtype, true)
        })
        .collect::<PolarsResult<Vec<_>>>()?;

    let tagged = StructChunked::from_series(name.into(), values.len(), fields.iter())?;
    Ok(tagged.into_series().into_column())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn json_cell(column: &str, cell: &Value) -> Result<AnyValue<'static>> {
    let value = match cell {
        Value::Null => AnyValue::Null,
        Value::Bool(b) => AnyValue::Boolean(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => AnyValue::Int64(i),
            (None, Some(f)) => AnyValue::Float64(f),
            (None, None) => {
                return Err(QualityError::InvalidInputType(format!(
                    "number {} out of range in column '{}'",
                    n, column
                )));
            }
        },
        Value::String(s) => AnyValue::StringOwned(s.as_str().into()),
        nested => {
            return Err(QualityError::InvalidInputType(format!(
                "{} cell in column '{}'",
                json_kind(nested),
                column
            )));
        }
    };
    Ok(value)
}

/// Load a delimited text file with a header row.
///
/// Strategies, in order:
/// 1. read with the configured schema inference length
/// 2. on failure, re-read inferring the schema from every row, for files whose
///    column type changes past the inference window
/// 3. on failure, re-read the content with doubled quotes collapsed and blank
///    lines removed
///
/// The last pass is lossy: a `""` escape inside a quoted field loses one of its
/// quotes. A missing file fails immediately.
pub fn load_delimited(path: &Path, options: &CsvLoadOptions) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(QualityError::load(path, "file does not exist"));
    }

    info!("Loading dataset from: {}", path.display());

    // Strategy 1: configured options
    let standard = read_options(options, options.infer_schema_length)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish());

    let df = match standard {
        Ok(df) => df,
        Err(e) => {
            debug!("Standard loading failed: {}", e);
            let rescanned = match options.infer_schema_length {
                Some(_) => load_with_full_schema_scan(path, options),
                None => Err(e),
            };
            match rescanned {
                Ok(df) => df,
                Err(e) => {
                    debug!("Full schema scan failed: {}", e);
                    load_cleaned(path, options)?
                }
            }
        }
    };

    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

// Strategy 2: infer every column's type from all rows
fn load_with_full_schema_scan(path: &Path, options: &CsvLoadOptions) -> PolarsResult<DataFrame> {
    info!("Retrying '{}' with schema inferred from every row", path.display());
    read_options(options, None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

// Strategy 3: pre-clean content
fn load_cleaned(path: &Path, options: &CsvLoadOptions) -> Result<DataFrame> {
    warn!(
        "Retrying '{}' with cleaned content after parse failure",
        path.display()
    );
    let content = std::fs::read_to_string(path).map_err(|e| QualityError::load(path, e))?;
    read_options(options, None)
        .into_reader_with_file_handle(Cursor::new(clean_csv_content(&content)))
        .finish()
        .map_err(|e| QualityError::load(path, e))
}

fn read_options(options: &CsvLoadOptions, infer_schema_length: Option<usize>) -> CsvReadOptions {
    let null_values = NullValues::AllColumns(
        options
            .null_markers
            .iter()
            .map(|marker| PlSmallStr::from(marker.as_str()))
            .collect(),
    );

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(options.separator)
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
}

/// Collapse doubled quotes and drop blank lines.
///
/// Repairs files with stray quoting at the cost of valid `""` escapes.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
