//! Integration tests for the data preparation pipeline.
//!
//! These exercise the pipeline end to end over tempdir fixtures, verifying
//! the invariants that hold after cleaning and feature engineering.

use bankprep::{Cleaner, FeatureEngineer, Pipeline, PipelineConfig, TableSchema};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Write a small semicolon-delimited bank-marketing-style fixture.
fn write_fixture(path: &Path) {
    let mut file = std::fs::File::create(path).expect("create fixture");
    writeln!(file, "age;job;marital;duration;campaign;previous;y").unwrap();
    writeln!(file, "25;admin.;married;10;1;0;no").unwrap();
    writeln!(file, "40;unknown;single;20;2;1;no").unwrap();
    writeln!(file, "35;technician;married;30;1;0;no").unwrap();
    writeln!(file, "80;services;unknown;10000;3;2;yes").unwrap();
    writeln!(file, "52;admin.;single;40;2;1;no").unwrap();
    writeln!(file, "29;technician;married;25;1;0;yes").unwrap();
}

fn pipeline_config(data_dir: &Path, output_dir: &Path) -> PipelineConfig {
    PipelineConfig::builder()
        .data_dir(data_dir)
        .output_dir(output_dir)
        .data_url("http://invalid.localhost/unused.zip")
        .build()
        .expect("valid config")
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_full_pipeline_over_cached_fixture() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("outputs");

    let config = pipeline_config(&data_dir, &output_dir);
    let data_path = config.data_path();
    std::fs::create_dir_all(data_path.parent().unwrap()).unwrap();
    write_fixture(&data_path);

    let summary = Pipeline::new(config).run().expect("pipeline run");

    assert_eq!(summary.shape_before, (6, 7));
    // Seven original columns plus three engineered ones, row count preserved
    assert_eq!(summary.shape_after, (6, 10));
    assert!(summary.output_path.exists());
    assert!(output_dir.join("eda_report.txt").exists());
    assert!(output_dir.join("eda_report.json").exists());
    assert!(output_dir.join("plots/hist_age.txt").exists());
    assert!(output_dir.join("plots/missingness.txt").exists());
    assert!(!summary.processing_steps.is_empty());
}

#[test]
fn test_full_pipeline_output_is_clean_and_scaled() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("outputs");

    let config = pipeline_config(&data_dir, &output_dir);
    let data_path = config.data_path();
    std::fs::create_dir_all(data_path.parent().unwrap()).unwrap();
    write_fixture(&data_path);

    let summary = Pipeline::new(config).run().expect("pipeline run");

    let processed = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(summary.output_path.clone()))
        .expect("reader")
        .finish()
        .expect("read processed.csv");

    // Engineered columns present
    for col in ["age_bucket", "duration_log", "campaign_prev_ratio"] {
        assert!(processed.column(col).is_ok(), "missing column {}", col);
    }

    // No missing values, no 'unknown' anywhere
    for col in processed.get_columns() {
        assert_eq!(col.null_count(), 0, "column {} has nulls", col.name());
        if matches!(col.dtype(), DataType::String) {
            let series = col.as_materialized_series().clone();
            let str_chunked = series.str().unwrap();
            for v in str_chunked.into_iter().flatten() {
                assert_ne!(v, "unknown");
            }
        }
    }

    // Every numeric column mean within tolerance of 0
    for col in processed.get_columns() {
        if matches!(col.dtype(), DataType::Float64) {
            let values: Vec<f64> = col
                .as_materialized_series()
                .f64()
                .unwrap()
                .into_iter()
                .flatten()
                .collect();
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            assert!(
                mean.abs() < 1e-6,
                "column {} has mean {}",
                col.name(),
                mean
            );
        }
    }
}

#[test]
fn test_pipeline_skip_reports() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("outputs");

    let config = PipelineConfig::builder()
        .data_dir(&data_dir)
        .output_dir(&output_dir)
        .data_url("http://invalid.localhost/unused.zip")
        .generate_reports(false)
        .build()
        .unwrap();
    let data_path = config.data_path();
    std::fs::create_dir_all(data_path.parent().unwrap()).unwrap();
    write_fixture(&data_path);

    let summary = Pipeline::new(config).run().expect("pipeline run");

    assert!(summary.output_path.exists());
    assert!(!output_dir.join("eda_report.txt").exists());
}

// ============================================================================
// Transform Chain Tests
// ============================================================================

#[test]
fn test_clean_then_features_on_loaded_fixture() {
    let dir = tempdir().unwrap();
    let data_path = dir.path().join("bank.csv");
    write_fixture(&data_path);

    let df = bankprep::fetch::read_semicolon_csv(&data_path).unwrap();
    let schema = TableSchema::from_dataframe(&df);
    let mut steps = Vec::new();

    let cleaned = Cleaner::clean(df, &schema, 1.5, &mut steps).unwrap();

    // Sentinel gone from both categorical columns that carried it
    for name in ["job", "marital"] {
        let col = cleaned.column(name).unwrap();
        assert_eq!(col.null_count(), 0);
        let series = col.as_materialized_series().clone();
        for v in series.str().unwrap().into_iter().flatten() {
            assert_ne!(v, "unknown");
        }
    }

    let out = FeatureEngineer::create_features_and_scale(cleaned, &schema, &mut steps).unwrap();
    assert_eq!(out.height(), 6);
    for col in out.get_columns() {
        assert_eq!(col.null_count(), 0);
    }
}

#[test]
fn test_clean_is_idempotent_on_fixture() {
    let dir = tempdir().unwrap();
    let data_path = dir.path().join("bank.csv");
    write_fixture(&data_path);

    let df = bankprep::fetch::read_semicolon_csv(&data_path).unwrap();
    let schema = TableSchema::from_dataframe(&df);

    let mut steps = Vec::new();
    let once = Cleaner::clean(df, &schema, 1.5, &mut steps).unwrap();
    let twice = Cleaner::clean(once.clone(), &schema, 1.5, &mut steps).unwrap();

    assert!(once.equals(&twice));
}

#[test]
fn test_semicolon_parsing_types_columns() {
    let dir = tempdir().unwrap();
    let data_path = dir.path().join("bank.csv");
    write_fixture(&data_path);

    let df = bankprep::fetch::read_semicolon_csv(&data_path).unwrap();
    let schema = TableSchema::from_dataframe(&df);

    assert_eq!(
        schema.numeric_columns(),
        vec!["age", "campaign", "duration", "previous"]
    );
    assert_eq!(schema.categorical_columns(), vec!["job", "marital", "y"]);
}

#[test]
fn test_fixture_roundtrip_with_explicit_parse_options() {
    let dir = tempdir().unwrap();
    let data_path = dir.path().join("bank.csv");
    write_fixture(&data_path);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_separator(b';'))
        .try_into_reader_with_file_path(Some(data_path))
        .unwrap()
        .finish()
        .unwrap();

    assert_eq!(df.shape(), (6, 7));
}
