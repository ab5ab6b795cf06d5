use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::QualityError;

/// Label used when a column's cells do not share one runtime type.
pub const DIFFERENT_TYPES: &str = "different";

/// Result of the type-consistency check for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeCheck {
    /// Every cell has this runtime type.
    Uniform(String),
    /// At least two cells have distinct runtime types.
    Different,
}

impl TypeCheck {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uniform(name) => name,
            Self::Different => DIFFERENT_TYPES,
        }
    }

    pub fn is_different(&self) -> bool {
        matches!(self, Self::Different)
    }
}

impl fmt::Display for TypeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TypeCheck {
    fn from(label: String) -> Self {
        if label == DIFFERENT_TYPES {
            Self::Different
        } else {
            Self::Uniform(label)
        }
    }
}

impl From<TypeCheck> for String {
    fn from(check: TypeCheck) -> Self {
        match check {
            TypeCheck::Uniform(name) => name,
            TypeCheck::Different => DIFFERENT_TYPES.to_string(),
        }
    }
}

/// One summary row: null/zero prevalence and type consistency of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQuality {
    pub column_name: String,
    /// (null_count + zero_count) / row_count * 100, rounded to 2 decimals.
    pub null_zero_percentage: f64,
    pub null_count: usize,
    pub null_percentage: f64,
    pub zero_count: usize,
    pub zero_percentage: f64,
    pub type_check: TypeCheck,
    /// Row count of the whole table, repeated on every row.
    pub row_count: usize,
}

impl ColumnQuality {
    /// Combined count. A cell counted both as null and as zero is counted twice.
    pub fn null_zero_count(&self) -> usize {
        self.null_count + self.zero_count
    }

    /// Compare two rows on a summary attribute.
    pub fn compare_by(&self, other: &Self, field: SummaryField) -> Ordering {
        match field {
            SummaryField::ColumnName => self.column_name.cmp(&other.column_name),
            SummaryField::NullZeroPercentage => self
                .null_zero_percentage
                .total_cmp(&other.null_zero_percentage),
            SummaryField::NullCount => self.null_count.cmp(&other.null_count),
            SummaryField::NullPercentage => {
                self.null_percentage.total_cmp(&other.null_percentage)
            }
            SummaryField::ZeroCount => self.zero_count.cmp(&other.zero_count),
            SummaryField::ZeroPercentage => {
                self.zero_percentage.total_cmp(&other.zero_percentage)
            }
            SummaryField::TypeCheck => self.type_check.as_str().cmp(other.type_check.as_str()),
            SummaryField::RowCount => self.row_count.cmp(&other.row_count),
        }
    }
}

/// Attributes of a summary row, in output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryField {
    ColumnName,
    NullZeroPercentage,
    NullCount,
    NullPercentage,
    ZeroCount,
    ZeroPercentage,
    TypeCheck,
    RowCount,
}

impl SummaryField {
    /// All attributes in the fixed output column order.
    pub const ALL: [SummaryField; 8] = [
        SummaryField::ColumnName,
        SummaryField::NullZeroPercentage,
        SummaryField::NullCount,
        SummaryField::NullPercentage,
        SummaryField::ZeroCount,
        SummaryField::ZeroPercentage,
        SummaryField::TypeCheck,
        SummaryField::RowCount,
    ];

    /// Column label in the summary table.
    pub fn name(self) -> &'static str {
        match self {
            Self::ColumnName => "column_name",
            Self::NullZeroPercentage => "null_zero_percentage",
            Self::NullCount => "null_count",
            Self::NullPercentage => "null_percentage",
            Self::ZeroCount => "zero_count",
            Self::ZeroPercentage => "zero_percentage",
            Self::TypeCheck => "type_check",
            Self::RowCount => "row_count",
        }
    }
}

impl fmt::Display for SummaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SummaryField {
    type Err = QualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| QualityError::ColumnNotFound(s.to_string()))
    }
}
