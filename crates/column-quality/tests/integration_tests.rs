//! Integration tests for the column quality reporter.
//!
//! These tests run the reporter end-to-end on CSV fixtures and in-memory tables.

use column_quality::{
    ColumnQuality, ColumnQualityReporter, DataSource, QualityError, ReportConfig, SummaryField,
    TypeCheck, ZeroMatching, analyze,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(filename: &str) -> PathBuf {
    fixtures_path().join(filename)
}

fn reporter(threshold: f64) -> ColumnQualityReporter {
    ColumnQualityReporter::new(ReportConfig::builder().threshold(threshold).build().unwrap())
        .unwrap()
}

fn names(rows: &[ColumnQuality]) -> Vec<&str> {
    rows.iter().map(|r| r.column_name.as_str()).collect()
}

fn find<'a>(rows: &'a [ColumnQuality], name: &str) -> &'a ColumnQuality {
    rows.iter()
        .find(|r| r.column_name == name)
        .unwrap_or_else(|| panic!("column '{}' missing from report", name))
}

fn has_two_decimals(value: f64) -> bool {
    ((value * 100.0).round() - value * 100.0).abs() < 1e-9
}

// ============================================================================
// Reference Example
// ============================================================================

#[test]
fn test_example_table_unfiltered() {
    let df = df![
        "A" => [Some(0i64), Some(1), None, Some(3)],
        "B" => [1i64, 2, 3, 4],
    ]
    .unwrap();

    let summary = analyze(df, 0.0, None, false).unwrap();

    assert_eq!(summary.height(), 2);
    let names = summary.column("column_name").unwrap().as_materialized_series();
    assert_eq!(names.str().unwrap().get(0), Some("A"));
    assert_eq!(names.str().unwrap().get(1), Some("B"));

    let pct = summary
        .column("null_zero_percentage")
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .clone();
    assert_eq!(pct.get(0), Some(50.0));
    assert_eq!(pct.get(1), Some(0.0));
}

#[test]
fn test_example_table_threshold_ten() {
    let df = df![
        "A" => [Some(0i64), Some(1), None, Some(3)],
        "B" => [1i64, 2, 3, 4],
    ]
    .unwrap();

    let summary = analyze(df, 10.0, None, false).unwrap();

    assert_eq!(summary.height(), 1);
    let names = summary.column("column_name").unwrap().as_materialized_series();
    assert_eq!(names.str().unwrap().get(0), Some("A"));
}

#[test]
fn test_example_csv_matches_in_memory() {
    let from_file = reporter(0.0).report(fixture("example.csv")).unwrap();

    let a = find(&from_file.rows, "A");
    assert_eq!(a.null_count, 1);
    assert_eq!(a.null_percentage, 25.0);
    assert_eq!(a.zero_count, 1);
    assert_eq!(a.zero_percentage, 25.0);
    assert_eq!(a.null_zero_percentage, 50.0);
    assert_eq!(a.row_count, 4);

    let b = find(&from_file.rows, "B");
    assert_eq!(b.null_zero_percentage, 0.0);
}

// ============================================================================
// CSV Fixture Tests
// ============================================================================

#[test]
fn test_passengers_unfiltered_keeps_file_order() {
    let report = reporter(0.0).report(fixture("passengers.csv")).unwrap();

    assert_eq!(report.total_rows, 8);
    assert_eq!(report.total_columns, 6);
    assert_eq!(
        names(&report.rows),
        vec!["id", "age", "fare", "name", "active", "code"]
    );
}

#[test]
fn test_passengers_statistics() {
    let report = reporter(0.0).report(fixture("passengers.csv")).unwrap();
    let rows = &report.rows;

    let age = find(rows, "age");
    assert_eq!(age.null_count, 2);
    assert_eq!(age.zero_count, 1);
    assert_eq!(age.null_zero_percentage, 37.5);
    assert_eq!(age.type_check, TypeCheck::Uniform("i64".to_string()));

    let fare = find(rows, "fare");
    assert_eq!(fare.null_count, 0);
    assert_eq!(fare.zero_count, 2);
    assert_eq!(fare.type_check, TypeCheck::Uniform("f64".to_string()));

    // "NA" and the empty field are both missing
    let name = find(rows, "name");
    assert_eq!(name.null_count, 2);
    assert_eq!(name.zero_count, 0);
    assert_eq!(name.type_check, TypeCheck::Different);

    let active = find(rows, "active");
    assert_eq!(active.null_count, 1);
    assert_eq!(active.zero_count, 0);
    assert!(active.type_check.is_different());

    let code = find(rows, "code");
    assert_eq!(code.zero_count, 4);
    assert_eq!(code.zero_percentage, 50.0);

    let id = find(rows, "id");
    assert_eq!(id.null_zero_percentage, 0.0);
    assert_eq!(id.type_check, TypeCheck::Uniform("i64".to_string()));
}

#[test]
fn test_passengers_threshold_sorted_descending() {
    let report = reporter(20.0).report(fixture("passengers.csv")).unwrap();

    // code 50, age 37.5, fare 25, name 25 (tie keeps file order)
    assert_eq!(names(&report.rows), vec!["code", "age", "fare", "name"]);
}

#[test]
fn test_passengers_include_false() {
    let config = ReportConfig::builder()
        .threshold(20.0)
        .zero_matching(ZeroMatching::IncludeFalse)
        .build()
        .unwrap();
    let report = ColumnQualityReporter::new(config)
        .unwrap()
        .report(fixture("passengers.csv"))
        .unwrap();

    let active = find(&report.rows, "active");
    assert_eq!(active.zero_count, 3);
    assert_eq!(active.null_zero_percentage, 50.0);
    assert_eq!(names(&report.rows), vec!["active", "code", "age", "fare", "name"]);
}

#[test]
fn test_custom_separator() {
    let config = ReportConfig::builder().separator(b';').build().unwrap();
    let report = ColumnQualityReporter::new(config)
        .unwrap()
        .report(fixture("semicolon.csv"))
        .unwrap();

    let x = find(&report.rows, "x");
    assert_eq!(x.zero_count, 2);
    assert_eq!(x.null_zero_percentage, 66.67);

    let y = find(&report.rows, "y");
    assert_eq!(y.null_count, 1);
    assert_eq!(y.null_percentage, 33.33);
    assert_eq!(y.type_check, TypeCheck::Different);
}

#[test]
fn test_column_type_change_past_inference_window() {
    let config = ReportConfig::builder()
        .infer_schema_length(Some(100))
        .build()
        .unwrap();
    let report = ColumnQualityReporter::new(config)
        .unwrap()
        .report(fixture("late_type_change.csv"))
        .unwrap();

    assert_eq!(report.total_rows, 151);
    let n = find(&report.rows, "n");
    assert_eq!(n.type_check, TypeCheck::Uniform("str".to_string()));
    assert_eq!(n.null_count, 0);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_summary_invariants_hold_for_every_column() {
    let report = reporter(0.0).report(fixture("passengers.csv")).unwrap();

    for row in &report.rows {
        assert_eq!(row.null_zero_count(), row.null_count + row.zero_count);
        for pct in [row.null_zero_percentage, row.null_percentage, row.zero_percentage] {
            assert!((0.0..=100.0).contains(&pct), "{} out of range", pct);
            assert!(has_two_decimals(pct), "{} not rounded", pct);
        }
        assert_eq!(row.row_count, report.total_rows);
    }
}

#[test]
fn test_filtered_rows_are_strictly_above_threshold() {
    for threshold in [5.0, 12.5, 25.0, 37.5, 49.99] {
        let report = reporter(threshold).report(fixture("passengers.csv")).unwrap();
        assert!(
            report
                .rows
                .iter()
                .all(|r| r.null_zero_percentage > threshold)
        );

        let all = reporter(0.0).report(fixture("passengers.csv")).unwrap();
        let expected = all
            .rows
            .iter()
            .filter(|r| r.null_zero_percentage > threshold)
            .count();
        assert_eq!(report.rows.len(), expected);
    }
}

#[test]
fn test_threshold_below_every_row_returns_all_sorted() {
    let df = df![
        "A" => [Some(0i64), Some(1), None, Some(3)],
        "B" => [1i64, 2, 3, 4],
    ]
    .unwrap();

    let summary = analyze(df, -1.0, None, true).unwrap();

    assert_eq!(summary.height(), 2);
    let names = summary.column("column_name").unwrap().as_materialized_series();
    assert_eq!(names.str().unwrap().get(0), Some("B"));
    assert_eq!(names.str().unwrap().get(1), Some("A"));
}

#[test]
fn test_small_positive_threshold_sorts_every_flagged_column() {
    let report = reporter(0.01).report(fixture("passengers.csv")).unwrap();

    // id is the only column with nothing missing or zero
    assert_eq!(
        names(&report.rows),
        vec!["code", "age", "fare", "name", "active"]
    );

    let all = reporter(-5.0).report(fixture("passengers.csv")).unwrap();
    assert_eq!(
        names(&all.rows),
        vec!["code", "age", "fare", "name", "active", "id"]
    );
}

#[test]
fn test_sort_order_is_monotone() {
    for field in SummaryField::ALL {
        for ascending in [true, false] {
            let config = ReportConfig::builder()
                .threshold(0.01)
                .sort_column(field.name())
                .ascending(ascending)
                .build()
                .unwrap();
            let report = ColumnQualityReporter::new(config)
                .unwrap()
                .report(fixture("passengers.csv"))
                .unwrap();

            for pair in report.rows.windows(2) {
                let ordering = pair[0].compare_by(&pair[1], field);
                if ascending {
                    assert!(ordering.is_le(), "{} not ascending", field);
                } else {
                    assert!(ordering.is_ge(), "{} not descending", field);
                }
            }
        }
    }
}

// ============================================================================
// Data Source Tests
// ============================================================================

#[test]
fn test_json_table_request() {
    let source = DataSource::try_from(json!({
        "A": [0, 1, null, 3],
        "B": [1, 2, 3, 4],
    }))
    .unwrap();

    let report = reporter(10.0).report(source).unwrap();
    assert_eq!(names(&report.rows), vec!["A"]);
    assert_eq!(report.rows[0].null_zero_percentage, 50.0);
}

#[test]
fn test_json_path_request() {
    let path = fixture("example.csv");
    let source = DataSource::try_from(json!(path.to_string_lossy())).unwrap();

    let report = reporter(0.0).report(source).unwrap();
    assert_eq!(report.rows.len(), 2);
}

#[test]
fn test_json_mixed_column_is_different() {
    let source = DataSource::try_from(json!({
        "label": ["x", null, "y", "z"],
    }))
    .unwrap();

    let report = reporter(0.0).report(source).unwrap();
    assert_eq!(report.rows[0].type_check, TypeCheck::Different);
    assert_eq!(report.rows[0].null_count, 1);
}

#[test]
fn test_json_column_mixing_scalar_kinds() {
    let source = DataSource::try_from(json!({
        "m": [0, "x", 2, true],
        "n": [1, 2.5, 0, null],
    }))
    .unwrap();

    let report = reporter(0.0).report(source).unwrap();

    let m = find(&report.rows, "m");
    assert_eq!(m.type_check, TypeCheck::Different);
    assert_eq!(m.zero_count, 1);
    assert_eq!(m.null_count, 0);
    assert_eq!(m.null_zero_percentage, 25.0);

    // integers and floats share one numeric column
    let n = find(&report.rows, "n");
    assert_eq!(n.type_check, TypeCheck::Uniform("f64".to_string()));
    assert_eq!(n.zero_count, 1);
    assert_eq!(n.null_count, 1);

    let summary = report.to_dataframe().unwrap();
    let labels = summary.column("type_check").unwrap().as_materialized_series();
    assert_eq!(labels.str().unwrap().get(0), Some("different"));
}

#[test]
fn test_integer_data_is_invalid_input_type() {
    let err = DataSource::try_from(json!(7)).unwrap_err();
    assert!(matches!(err, QualityError::InvalidInputType(_)));
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_missing_file_is_load_error() {
    let err = analyze(fixture("does_not_exist.csv"), 0.0, None, false).unwrap_err();
    assert!(matches!(err, QualityError::Load { .. }));
    assert_eq!(err.error_code(), "LOAD_ERROR");
}

#[test]
fn test_nonexistent_sort_column() {
    let df = df!["A" => [Some(0i64), None]].unwrap();
    let err = analyze(df, 10.0, Some("nonexistent"), false).unwrap_err();
    assert!(matches!(err, QualityError::ColumnNotFound(ref name) if name == "nonexistent"));
}

#[test]
fn test_invalid_separator_is_invalid_config() {
    let err = ReportConfig::builder().separator(b'"').build().unwrap_err();
    assert_eq!(QualityError::from(err).error_code(), "INVALID_CONFIG");
}

#[test]
fn test_caller_table_is_unchanged() {
    let df = df![
        "A" => [Some(0i64), Some(1), None, Some(3)],
        "B" => [Some("x"), None, Some("y"), Some("z")],
    ]
    .unwrap();
    let before = df.clone();

    let report = reporter(10.0).report_frame(&df, "caller").unwrap();

    assert_eq!(report.rows.len(), 2);
    assert!(df.equals_missing(&before));
}
