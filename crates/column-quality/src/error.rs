//! Error types for the column quality reporter.
//!
//! Errors are built with `thiserror` and carry a stable error code so that a
//! caller (CLI, UI layer) can react to specific failures. They serialize as
//! `{ "code": ..., "message": ... }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for quality reporting.
#[derive(Error, Debug)]
pub enum QualityError {
    /// The data argument is neither a file path nor a table.
    #[error("Invalid input type: expected a file path or a table, got {0}")]
    InvalidInputType(String),

    /// The input file is missing or could not be parsed.
    #[error("Failed to load '{}': {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// The requested summary attribute does not exist.
    #[error("Column '{0}' not found in summary")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

impl QualityError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Build a load error for `path`.
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        QualityError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable error code, preserved through [`QualityError::with_context`].
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInputType(_) => "INVALID_INPUT_TYPE",
            Self::Load { .. } => "LOAD_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Strip any context wrappers and return the underlying error.
    pub fn root(&self) -> &QualityError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for quality reporting.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Polars(e).with_context(context))
    }
}
