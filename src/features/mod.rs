//! Feature engineering and standardization.
//!
//! Derives three columns from business-meaningful inputs and standardizes all
//! numeric columns. Runs strictly after [`Cleaner::clean`]; a missing value in
//! any numeric column here is a contract violation (the cleaner was skipped or
//! misordered) and fails fast.
//!
//! [`Cleaner::clean`]: crate::cleaner::Cleaner::clean

use crate::error::{PrepError, Result};
use crate::schema::{ColumnKind, TableSchema};
use crate::utils::mean_and_std;
use polars::prelude::*;
use tracing::{debug, warn};

/// Age bucket bin edges: `[0, 30] -> young, (30, 60] -> adult, (60, 120] -> senior`.
pub const AGE_BUCKET_EDGES: [f64; 4] = [0.0, 30.0, 60.0, 120.0];

/// Labels for the age buckets, aligned with [`AGE_BUCKET_EDGES`].
pub const AGE_BUCKET_LABELS: [&str; 3] = ["young", "adult", "senior"];

/// Derives engineered columns and standardizes numeric columns.
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Derive `age_bucket` from `age` using fixed bin edges.
    ///
    /// Ages are clamped into `[0, 120]` before bucketing, so out-of-range
    /// values map to the nearest boundary bucket and no missing bucket can
    /// appear after a cleaned table.
    pub fn add_age_bucket(df: DataFrame, steps: &mut Vec<String>) -> Result<DataFrame> {
        let mut df = df;
        let ages = Self::required_numeric(&df, "age", "age_bucket")?;

        let buckets: Vec<String> = ages
            .iter()
            .map(|age| {
                let a = age.clamp(AGE_BUCKET_EDGES[0], AGE_BUCKET_EDGES[3]);
                let label = if a <= AGE_BUCKET_EDGES[1] {
                    AGE_BUCKET_LABELS[0]
                } else if a <= AGE_BUCKET_EDGES[2] {
                    AGE_BUCKET_LABELS[1]
                } else {
                    AGE_BUCKET_LABELS[2]
                };
                label.to_string()
            })
            .collect();

        df.with_column(Series::new("age_bucket".into(), buckets))?;
        steps.push("Derived 'age_bucket' from 'age'".to_string());
        Ok(df)
    }

    /// Derive `duration_log` as `ln(1 + max(duration, 0))`.
    ///
    /// Negative durations are clamped to zero before the log transform.
    pub fn add_duration_log(df: DataFrame, steps: &mut Vec<String>) -> Result<DataFrame> {
        let mut df = df;
        let durations = Self::required_numeric(&df, "duration", "duration_log")?;

        let logs: Vec<f64> = durations.iter().map(|d| d.max(0.0).ln_1p()).collect();

        df.with_column(Series::new("duration_log".into(), logs))?;
        steps.push("Derived 'duration_log' from 'duration'".to_string());
        Ok(df)
    }

    /// Derive `campaign_prev_ratio` as `campaign / (previous + 1)`.
    ///
    /// The `+1` avoids division by zero when `previous` is 0.
    pub fn add_campaign_prev_ratio(df: DataFrame, steps: &mut Vec<String>) -> Result<DataFrame> {
        let mut df = df;
        let campaigns = Self::required_numeric(&df, "campaign", "campaign_prev_ratio")?;
        let previous = Self::required_numeric(&df, "previous", "campaign_prev_ratio")?;

        let ratios: Vec<f64> = campaigns
            .iter()
            .zip(previous.iter())
            .map(|(c, p)| c / (p + 1.0))
            .collect();

        df.with_column(Series::new("campaign_prev_ratio".into(), ratios))?;
        steps.push("Derived 'campaign_prev_ratio' from 'campaign' and 'previous'".to_string());
        Ok(df)
    }

    /// Standardize every numeric column to zero mean and unit variance.
    ///
    /// Columns are classified by the extended schema (the loader's schema plus
    /// the engineered numeric columns); `age_bucket` is categorical and left
    /// alone. A zero-variance column keeps a divisor of 1.0 so its values
    /// become the centered zeros instead of NaN; this is logged as a warning.
    pub fn scale(
        df: DataFrame,
        schema: &TableSchema,
        steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        Self::ensure_no_missing_numeric(&df, schema)?;
        let mut df = df;

        for col_name in schema.numeric_columns() {
            let Ok(col) = df.column(col_name) else {
                continue;
            };
            let series = col.as_materialized_series();
            let float_series = series.cast(&DataType::Float64)?;
            let values: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
            if values.is_empty() {
                continue;
            }

            let (mean, std) = mean_and_std(&values);
            let divisor = if std == 0.0 {
                warn!(
                    "Column '{}' has zero variance; centering without scaling",
                    col_name
                );
                1.0
            } else {
                std
            };

            let scaled: Vec<f64> = values.iter().map(|v| (v - mean) / divisor).collect();
            df.replace(col_name, Series::new(col_name.into(), scaled))?;
            debug!("Standardized '{}' (mean {:.4}, std {:.4})", col_name, mean, std);
        }

        steps.push(format!(
            "Standardized {} numeric columns",
            schema.numeric_columns().len()
        ));
        Ok(df)
    }

    /// Derive all engineered columns, then standardize numeric columns.
    ///
    /// Entry point called by the orchestrator. The input schema is the
    /// loader's; the engineered columns are appended to it internally before
    /// scaling.
    pub fn create_features_and_scale(
        df: DataFrame,
        schema: &TableSchema,
        steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        let df = Self::add_age_bucket(df, steps)?;
        let df = Self::add_duration_log(df, steps)?;
        let df = Self::add_campaign_prev_ratio(df, steps)?;

        let extended = schema
            .clone()
            .with_column("age_bucket", ColumnKind::Categorical)
            .with_column("duration_log", ColumnKind::Numeric)
            .with_column("campaign_prev_ratio", ColumnKind::Numeric);

        Self::scale(df, &extended, steps)
    }

    /// Verify the scaling precondition: no numeric column contains a null.
    fn ensure_no_missing_numeric(df: &DataFrame, schema: &TableSchema) -> Result<()> {
        for col_name in schema.numeric_columns() {
            if let Ok(col) = df.column(col_name) {
                let nulls = col.null_count();
                if nulls > 0 {
                    return Err(PrepError::contract(
                        "scale",
                        format!(
                            "numeric column '{}' contains {} missing values; \
                             run the cleaner before feature engineering",
                            col_name, nulls
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Extract a fully-populated numeric column as f64 values.
    fn required_numeric(df: &DataFrame, col_name: &str, feature: &str) -> Result<Vec<f64>> {
        let col = df
            .column(col_name)
            .map_err(|_| PrepError::ColumnNotFound(col_name.to_string()))?;
        let series = col.as_materialized_series();
        if series.null_count() > 0 {
            return Err(PrepError::contract(
                feature,
                format!(
                    "input column '{}' contains {} missing values",
                    col_name,
                    series.null_count()
                ),
            ));
        }
        let float_series = series.cast(&DataType::Float64)?;
        Ok(float_series.f64()?.into_iter().flatten().collect())
    }
}
