//! Data cleaning: sentinel normalization, imputation, outlier capping.
//!
//! The three transforms run in a fixed order and preserve row count and the
//! column set. [`Cleaner::clean`] is the sole entry point other components
//! call. Every transform consumes its input table and returns a new one;
//! column classification comes from the [`TableSchema`] built by the loader,
//! never from dtype sniffing.

use crate::error::Result;
use crate::schema::TableSchema;
use crate::utils::{fill_numeric_nulls, fill_string_nulls, linear_quantile, string_mode};
use polars::prelude::*;
use tracing::debug;

/// Sentinel literal that marks missingness in categorical columns.
pub const MISSING_SENTINEL: &str = "unknown";

/// Fill value for categorical columns with no observed values at all.
pub const EMPTY_COLUMN_FILL: &str = "missing";

/// Default IQR fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Cleans a raw table into one with no missing values and no extreme outliers.
pub struct Cleaner;

impl Cleaner {
    /// Replace the `"unknown"` sentinel with nulls in categorical columns.
    ///
    /// Columns that never contain the sentinel are left untouched.
    pub fn normalize_sentinels(
        df: DataFrame,
        schema: &TableSchema,
        steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        let mut df = df;

        for col_name in schema.categorical_columns() {
            let Ok(col) = df.column(col_name) else {
                continue;
            };
            let series = col.as_materialized_series();
            let Ok(str_series) = series.cast(&DataType::String) else {
                continue;
            };
            let str_chunked = str_series.str()?;

            let sentinel_count = str_chunked
                .into_iter()
                .filter(|v| *v == Some(MISSING_SENTINEL))
                .count();
            if sentinel_count == 0 {
                continue;
            }

            let normalized: Vec<Option<String>> = str_chunked
                .into_iter()
                .map(|v| match v {
                    Some(MISSING_SENTINEL) => None,
                    other => other.map(|s| s.to_string()),
                })
                .collect();

            df.replace(col_name, Series::new(col_name.into(), normalized))?;
            steps.push(format!(
                "Marked {} '{}' values in '{}' as missing",
                sentinel_count, MISSING_SENTINEL, col_name
            ));
            debug!("Normalized {} sentinel values in '{}'", sentinel_count, col_name);
        }

        Ok(df)
    }

    /// Impute missing values: median for numeric, mode for categorical.
    ///
    /// Columns without missing values are untouched. Mode ties break to the
    /// lexicographically smallest candidate; a categorical column with zero
    /// observed values fills with the literal `"missing"`.
    pub fn impute(
        df: DataFrame,
        schema: &TableSchema,
        steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        let mut df = df;

        for col_name in schema.numeric_columns() {
            let Ok(col) = df.column(col_name) else {
                continue;
            };
            let series = col.as_materialized_series().clone();
            if series.null_count() == 0 {
                continue;
            }

            let mut values: Vec<f64> = series
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .flatten()
                .collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            // All-null numeric columns have no median to impute from.
            let Some(median) = linear_quantile(&values, 0.5) else {
                continue;
            };

            let filled = fill_numeric_nulls(&series, median)?;
            df.replace(col_name, filled)?;
            steps.push(format!("Filled '{}' with median: {:.2}", col_name, median));
        }

        for col_name in schema.categorical_columns() {
            let Ok(col) = df.column(col_name) else {
                continue;
            };
            let series = col.as_materialized_series().clone();
            if series.null_count() == 0 {
                continue;
            }

            let fill = string_mode(&series).unwrap_or_else(|| EMPTY_COLUMN_FILL.to_string());
            let filled = fill_string_nulls(&series, &fill)?;
            df.replace(col_name, filled)?;
            steps.push(format!("Filled '{}' with mode: '{}'", col_name, fill));
        }

        Ok(df)
    }

    /// Winsorize every numeric column at `[Q1 - k*IQR, Q3 + k*IQR]`.
    ///
    /// Quartiles use linear-interpolation quantiles over the pre-cap values.
    /// Runs after imputation, so no missing values reach this step; null cells
    /// that do appear are passed through unchanged.
    pub fn cap_outliers(
        df: DataFrame,
        schema: &TableSchema,
        k: f64,
        steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        let mut df = df;

        for col_name in schema.numeric_columns() {
            let Ok(col) = df.column(col_name) else {
                continue;
            };
            let series = col.as_materialized_series();

            let float_series = series.cast(&DataType::Float64)?;
            let mut sorted: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let (Some(q1), Some(q3)) = (
                linear_quantile(&sorted, 0.25),
                linear_quantile(&sorted, 0.75),
            ) else {
                continue;
            };
            let iqr = q3 - q1;
            let lower = q1 - k * iqr;
            let upper = q3 + k * iqr;

            let capped_count = sorted.iter().filter(|v| **v < lower || **v > upper).count();

            let capped = float_series
                .f64()?
                .apply(|v| v.map(|val| val.clamp(lower, upper)));
            df.replace(col_name, capped.into_series().with_name(col_name.into()))?;

            if capped_count > 0 {
                steps.push(format!(
                    "Capped {} outliers in '{}' at [{:.2}, {:.2}]",
                    capped_count, col_name, lower, upper
                ));
                debug!("Capped {} outliers in '{}'", capped_count, col_name);
            }
        }

        Ok(df)
    }

    /// Full cleaning pass: normalize sentinels, impute, cap outliers.
    pub fn clean(
        df: DataFrame,
        schema: &TableSchema,
        k: f64,
        steps: &mut Vec<String>,
    ) -> Result<DataFrame> {
        let df = Self::normalize_sentinels(df, schema, steps)?;
        let df = Self::impute(df, schema, steps)?;
        Self::cap_outliers(df, schema, k, steps)
    }
}
