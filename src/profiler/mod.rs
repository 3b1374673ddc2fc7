//! Read-only descriptive statistics over a table.
//!
//! The profiler never mutates data; it produces an [`EdaReport`] the reporter
//! renders to text and JSON. Missingness counts treat the `"unknown"` sentinel
//! in categorical columns as missing, so the pre-clean report shows the real
//! extent of the problem.

use crate::cleaner::MISSING_SENTINEL;
use crate::error::Result;
use crate::schema::{ColumnKind, TableSchema};
use crate::utils::{numeric_values, pearson_correlation, skewness, string_mode};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Statistical profile of a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Nulls plus `"unknown"` sentinel cells for categorical columns.
    pub missing_count: usize,
    pub missing_percentage: f64,
    pub unique_count: usize,
    /// Numeric columns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skewness: Option<f64>,
    /// Categorical columns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_frequent: Option<String>,
}

/// Full exploratory profile of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    /// (rows, columns)
    pub shape: (usize, usize),
    pub column_profiles: Vec<ColumnProfile>,
    /// Pearson correlations between numeric column pairs, `(a, b, r)` with
    /// `a < b` in name order.
    pub correlations: Vec<(String, String, f64)>,
    /// Class counts of the `y` target column, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_balance: Option<Vec<(String, usize)>>,
    /// Free-form notes, e.g. plot artifacts that could not be produced.
    pub notes: Vec<String>,
}

/// Computes descriptive statistics for a table.
pub struct Profiler;

impl Profiler {
    /// Profile every schema column present in the DataFrame.
    pub fn profile(df: &DataFrame, schema: &TableSchema) -> Result<EdaReport> {
        let height = df.height();
        let mut column_profiles = Vec::new();

        for col in df.get_columns() {
            let name = col.name().to_string();
            let Some(kind) = schema.kind(&name) else {
                continue;
            };
            let series = col.as_materialized_series().clone();
            column_profiles.push(Self::profile_column(&series, &name, kind, height)?);
        }

        let correlations = Self::correlations(df, schema)?;
        let target_balance = Self::target_balance(df)?;

        Ok(EdaReport {
            shape: df.shape(),
            column_profiles,
            correlations,
            target_balance,
            notes: Vec::new(),
        })
    }

    fn profile_column(
        series: &Series,
        name: &str,
        kind: ColumnKind,
        height: usize,
    ) -> Result<ColumnProfile> {
        let mut missing_count = series.null_count();
        let unique_count = series.n_unique()?;

        let mut profile = ColumnProfile {
            name: name.to_string(),
            kind,
            missing_count: 0,
            missing_percentage: 0.0,
            unique_count,
            mean: None,
            std: None,
            min: None,
            max: None,
            skewness: None,
            most_frequent: None,
        };

        match kind {
            ColumnKind::Numeric => {
                let values = numeric_values(series)?;
                if !values.is_empty() {
                    let (mean, std) = crate::utils::mean_and_std(&values);
                    profile.mean = Some(mean);
                    profile.std = Some(std);
                    profile.min = values.iter().copied().fold(None, |acc: Option<f64>, v| {
                        Some(acc.map_or(v, |a| a.min(v)))
                    });
                    profile.max = values.iter().copied().fold(None, |acc: Option<f64>, v| {
                        Some(acc.map_or(v, |a| a.max(v)))
                    });
                    profile.skewness = Some(skewness(&values));
                }
            }
            ColumnKind::Categorical => {
                if let Ok(str_series) = series.cast(&DataType::String) {
                    let str_chunked = str_series.str()?;
                    missing_count += str_chunked
                        .into_iter()
                        .filter(|v| *v == Some(MISSING_SENTINEL))
                        .count();
                }
                profile.most_frequent = string_mode(series);
            }
        }

        profile.missing_count = missing_count;
        profile.missing_percentage = if height == 0 {
            0.0
        } else {
            missing_count as f64 / height as f64 * 100.0
        };

        Ok(profile)
    }

    /// Pairwise Pearson correlations over fully-observed numeric values.
    ///
    /// Rows where either column is null are skipped pairwise.
    fn correlations(
        df: &DataFrame,
        schema: &TableSchema,
    ) -> Result<Vec<(String, String, f64)>> {
        let numeric: Vec<&str> = schema
            .numeric_columns()
            .into_iter()
            .filter(|n| df.column(n).is_ok())
            .collect();

        let mut result = Vec::new();
        for (i, a) in numeric.iter().enumerate() {
            for b in numeric.iter().skip(i + 1) {
                let col_a = df.column(a)?.as_materialized_series().cast(&DataType::Float64)?;
                let col_b = df.column(b)?.as_materialized_series().cast(&DataType::Float64)?;

                let mut xs = Vec::new();
                let mut ys = Vec::new();
                for (x, y) in col_a.f64()?.into_iter().zip(col_b.f64()?.into_iter()) {
                    if let (Some(x), Some(y)) = (x, y) {
                        xs.push(x);
                        ys.push(y);
                    }
                }
                result.push((a.to_string(), b.to_string(), pearson_correlation(&xs, &ys)));
            }
        }
        Ok(result)
    }

    /// Class counts for the `y` column, ordered by descending count.
    fn target_balance(df: &DataFrame) -> Result<Option<Vec<(String, usize)>>> {
        let Ok(col) = df.column("y") else {
            return Ok(None);
        };
        let series = col.as_materialized_series();
        let Ok(str_series) = series.cast(&DataType::String) else {
            return Ok(None);
        };
        let str_chunked = str_series.str()?;

        let mut counts: std::collections::BTreeMap<String, usize> =
            std::collections::BTreeMap::new();
        for val in str_chunked.into_iter().flatten() {
            *counts.entry(val.to_string()).or_insert(0) += 1;
        }

        let mut balance: Vec<(String, usize)> = counts.into_iter().collect();
        balance.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(Some(balance))
    }
}
