//! Shared utilities for the data preparation pipeline.
//!
//! Statistical helpers used across the cleaner, feature engineer and profiler.
//! Quantiles use linear interpolation (the conventional default of statistical
//! libraries) so the IQR fences and medians are numerically reproducible.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
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
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Collect the non-null values of a numeric Series as f64.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().flatten().collect())
}

/// Linear-interpolation quantile over an already-sorted slice.
///
/// With `h = (n - 1) * q`, the result interpolates between the values at
/// `floor(h)` and `ceil(h)`. Returns `None` for an empty slice.
pub fn linear_quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Median of the non-null values of a numeric Series.
pub fn series_median(series: &Series) -> PolarsResult<Option<f64>> {
    let mut values = numeric_values(series)?;
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(linear_quantile(&values, 0.5))
}

/// Mean and population standard deviation of a slice.
///
/// Population (not sample) standard deviation matches the standardization
/// semantics of the scaler: a standardized column has exactly unit variance.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Skewness of a slice (population definition). Zero for constant columns.
pub fn skewness(values: &[f64]) -> f64 {
    let (mean, std) = mean_and_std(values);
    if std == 0.0 || values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / n
}

/// Pearson correlation between two equally-long slices.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }
    let (mx, sx) = mean_and_std(x);
    let (my, sy) = mean_and_std(y);
    if sx == 0.0 || sy == 0.0 {
        return 0.0;
    }
    let n = x.len() as f64;
    let cov = x
        .iter()
        .zip(y.iter())
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / n;
    cov / (sx * sy)
}

/// Mode (most frequent non-null value) of a string Series.
///
/// Ties are broken deterministically: among equally frequent candidates the
/// lexicographically smallest value wins.
pub fn string_mode(series: &Series) -> Option<String> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return None;
    }

    let str_series = non_null.cast(&DataType::String).ok()?;
    let str_chunked = str_series.str().ok()?;

    let mut value_counts: std::collections::HashMap<String, usize> =
        std::collections::HashMap::new();
    for val in str_chunked.into_iter().flatten() {
        *value_counts.entry(val.to_string()).or_insert(0) += 1;
    }

    value_counts
        .into_iter()
        .max_by(|(val_a, count_a), (val_b, count_b)| {
            count_a.cmp(count_b).then(val_b.cmp(val_a))
        })
        .map(|(val, _)| val)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always Float64, regardless of the input's numeric dtype.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let filled = float_series
        .f64()?
        .apply(|v| Some(v.unwrap_or(fill_value)));
    Ok(filled.into_series().with_name(series.name().clone()))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = series.cast(&DataType::String)?;
    let str_chunked = str_series.str()?;
    let filled: Vec<Option<String>> = str_chunked
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value).to_string()))
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_linear_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        // h = 3 * 0.25 = 0.75 -> 1 + 0.75 * (2 - 1)
        assert_eq!(linear_quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(linear_quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(linear_quantile(&sorted, 0.75), Some(3.25));
        assert_eq!(linear_quantile(&sorted, 0.0), Some(1.0));
        assert_eq!(linear_quantile(&sorted, 1.0), Some(4.0));
    }

    #[test]
    fn test_linear_quantile_edge_cases() {
        assert_eq!(linear_quantile(&[], 0.5), None);
        assert_eq!(linear_quantile(&[42.0], 0.25), Some(42.0));
    }

    #[test]
    fn test_series_median_with_nulls() {
        let series = Series::new("age".into(), &[Some(25.0), None, Some(80.0)]);
        assert_eq!(series_median(&series).unwrap(), Some(52.5));
    }

    #[test]
    fn test_mean_and_std_population() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_and_std_constant() {
        let (mean, std) = mean_and_std(&[3.0, 3.0, 3.0]);
        assert_eq!(mean, 3.0);
        assert_eq!(std, 0.0);
    }

    #[test]
    fn test_skewness_symmetric_is_zero() {
        assert!(skewness(&[1.0, 2.0, 3.0]).abs() < 1e-12);
        assert_eq!(skewness(&[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_pearson_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson_correlation(&x, &y) - 1.0).abs() < 1e-12);

        let y_neg = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson_correlation(&x, &y_neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_correlation_zero_variance() {
        let x = [1.0, 2.0, 3.0];
        let y = [5.0, 5.0, 5.0];
        assert_eq!(pearson_correlation(&x, &y), 0.0);
    }

    #[test]
    fn test_string_mode_basic() {
        let series = Series::new("job".into(), &["a", "b", "a", "c", "a"]);
        assert_eq!(string_mode(&series), Some("a".to_string()));
    }

    #[test]
    fn test_string_mode_tie_breaks_lexicographically() {
        let series = Series::new("job".into(), &[Some("beta"), Some("alpha"), None]);
        assert_eq!(string_mode(&series), Some("alpha".to_string()));
    }

    #[test]
    fn test_string_mode_all_null() {
        let series = Series::new("job".into(), &[Option::<&str>::None, None]);
        assert_eq!(string_mode(&series), None);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("v".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 2.0).unwrap();
        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 2.0);
    }

    #[test]
    fn test_fill_numeric_nulls_integer_input() {
        let series = Series::new("v".into(), &[Some(1i64), None, Some(3)]);
        let filled = fill_numeric_nulls(&series, 2.5).unwrap();
        assert!(matches!(filled.dtype(), DataType::Float64));
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 2.5);
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("job".into(), &[Some("admin."), None]);
        let filled = fill_string_nulls(&series, "missing").unwrap();
        assert_eq!(filled.null_count(), 0);
        assert!(filled.get(1).unwrap().to_string().contains("missing"));
    }
}
