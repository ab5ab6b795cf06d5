//! Shared utilities for column statistics.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is a float type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || is_float_dtype(dtype)
}

/// Runtime type name of a cell of this dtype (`i64`, `f64`, `str`, `bool`, ...).
pub fn dtype_name(dtype: &DataType) -> String {
    dtype.to_string()
}

// =============================================================================
// Percentage Utilities
// =============================================================================

/// Round to 2 decimal places, half away from zero.
///
/// # Example
///
/// ```rust,ignore
/// use column_quality::utils::round2;
///
/// assert_eq!(round2(0.125), 0.13);
/// assert_eq!(round2(33.333), 33.33);
/// ```
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `count / total * 100`, rounded to 2 decimals. An empty table yields `0.0`.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Multiply first so exact ratios like 100 / 800 stay exact before rounding.
    round2(count as f64 * 100.0 / total as f64)
}
