//! Per-column counting functions.

use polars::prelude::*;

use crate::config::ZeroMatching;
use crate::types::TypeCheck;
use crate::utils::{dtype_name, is_float_dtype, is_numeric_dtype};

/// Count missing cells. NaN counts as missing in float columns.
pub(crate) fn count_nulls(series: &Series) -> PolarsResult<usize> {
    if is_tagged_dtype(series.dtype()) {
        let (fields, cells) = tagged_cells(series)?;
        let mut nulls = cells.iter().filter(|cell| cell.is_none()).count();
        for field in &fields {
            nulls += count_nan(field)?;
        }
        return Ok(nulls);
    }

    Ok(series.null_count() + count_nan(series)?)
}

fn count_nan(series: &Series) -> PolarsResult<usize> {
    if !is_float_dtype(series.dtype()) {
        return Ok(0);
    }
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .filter(|v| v.is_some_and(f64::is_nan))
        .count())
}

/// Count cells equal to zero.
///
/// Integer and float columns compare numerically (`-0.0` is zero). Boolean
/// `false` only counts under [`ZeroMatching::IncludeFalse`]. String cells
/// never count, `"0"` included. In a tagged-variant column each cell is judged
/// by its own type.
pub(crate) fn count_zeros(series: &Series, matching: ZeroMatching) -> PolarsResult<usize> {
    let dtype = series.dtype();

    if is_tagged_dtype(dtype) {
        let mut zeros = 0;
        for field in series.struct_()?.fields_as_series() {
            zeros += count_zeros(&field, matching)?;
        }
        return Ok(zeros);
    }

    if is_numeric_dtype(dtype) {
        let floats = series.cast(&DataType::Float64)?;
        return Ok(floats
            .f64()?
            .into_iter()
            .filter(|v| *v == Some(0.0))
            .count());
    }

    if matching == ZeroMatching::IncludeFalse && matches!(dtype, DataType::Boolean) {
        return Ok(series
            .bool()?
            .into_iter()
            .filter(|v| *v == Some(false))
            .count());
    }

    Ok(0)
}

/// Runtime type consistency of a column.
///
/// Missing cells in numeric columns are missing numbers and share the column
/// type. Missing cells in other columns have type `null`, so a non-numeric
/// column holding both values and nulls is [`TypeCheck::Different`]. A
/// tagged-variant column is [`TypeCheck::Different`] as soon as two cells hold
/// values of distinct types.
pub(crate) fn type_check(series: &Series) -> PolarsResult<TypeCheck> {
    if !is_tagged_dtype(series.dtype()) {
        return Ok(label(series.dtype(), series.null_count(), series.len()));
    }

    let (fields, cells) = tagged_cells(series)?;
    let mut present: Vec<usize> = Vec::new();
    for &field in cells.iter().flatten() {
        if !present.contains(&field) {
            present.push(field);
        }
    }
    let missing = cells.iter().filter(|cell| cell.is_none()).count();

    Ok(match present.as_slice() {
        [] => label(&DataType::Null, missing, cells.len()),
        [field] => label(fields[*field].dtype(), missing, cells.len()),
        _ => TypeCheck::Different,
    })
}

fn label(dtype: &DataType, missing: usize, len: usize) -> TypeCheck {
    if is_numeric_dtype(dtype) || missing == 0 {
        TypeCheck::Uniform(dtype_name(dtype))
    } else if missing == len {
        TypeCheck::Uniform(dtype_name(&DataType::Null))
    } else {
        TypeCheck::Different
    }
}

/// Struct columns hold tagged-variant cells: one field per cell type, with a
/// row's value in the field of its own type.
fn is_tagged_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Struct(_))
}

/// Fields of a tagged-variant column and, per row, the index of the field
/// holding its value (`None` for a missing cell).
fn tagged_cells(series: &Series) -> PolarsResult<(Vec<Series>, Vec<Option<usize>>)> {
    let fields = series.struct_()?.fields_as_series();
    let rows = series.is_not_null();
    let present: Vec<BooleanChunked> = fields.iter().map(|field| field.is_not_null()).collect();

    let cells = (0..series.len())
        .map(|row| {
            if rows.get(row) != Some(true) {
                return None;
            }
            present.iter().position(|mask| mask.get(row) == Some(true))
        })
        .collect();

    Ok((fields, cells))
}
