//! Report and plot artifact generation.
//!
//! Renders an [`EdaReport`] to `eda_report.txt` and `eda_report.json`, and
//! writes text plot artifacts (histograms, missingness overview) under
//! `<out>/plots/`. Each plot artifact is individually fallible: a failure is
//! logged, recorded as a note in the report, and never aborts the pipeline.

use crate::config::PipelineConfig;
use crate::error::{PrepError, Result};
use crate::profiler::EdaReport;
use crate::schema::{ColumnKind, TableSchema};
use crate::utils::numeric_values;
use chrono::Local;
use polars::prelude::*;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Number of bins used in histogram artifacts.
const HISTOGRAM_BINS: usize = 10;

/// Maximum bar width, in characters.
const BAR_WIDTH: usize = 50;

/// Number of leading rows shown in the missingness overview.
const MISSINGNESS_ROWS: usize = 100;

/// Writes the EDA report and plot artifacts to disk.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write report text, report JSON and all plot artifacts.
    ///
    /// Plot failures degrade to notes appended to the report; the report files
    /// themselves are required to succeed.
    pub fn write_all(
        &self,
        df: &DataFrame,
        schema: &TableSchema,
        report: &EdaReport,
        config: &PipelineConfig,
    ) -> Result<()> {
        let plots_dir = self.output_dir.join("plots");
        fs::create_dir_all(&plots_dir)?;

        let mut report = report.clone();
        self.write_plots(df, schema, config, &plots_dir, &mut report.notes);

        let text_path = self.output_dir.join("eda_report.txt");
        fs::write(&text_path, Self::render_text(&report))?;
        info!("EDA report written to {}", text_path.display());

        let json_path = self.output_dir.join("eda_report.json");
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&json_path, json)?;

        Ok(())
    }

    /// Render the report as human-readable text.
    pub fn render_text(report: &EdaReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "EDA Report");
        let _ = writeln!(out, "==========");
        let _ = writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out);
        let _ = writeln!(out, "Shape: {} rows x {} columns", report.shape.0, report.shape.1);
        let _ = writeln!(out);

        let _ = writeln!(
            out,
            "{:<22} {:<12} {:>9} {:>8} {:>12} {:>12}",
            "Column", "Kind", "Missing %", "Unique", "Mean", "Std"
        );
        let _ = writeln!(out, "{}", "-".repeat(80));
        for col in &report.column_profiles {
            let kind = match col.kind {
                ColumnKind::Numeric => "numeric",
                ColumnKind::Categorical => "categorical",
            };
            let fmt_opt = |v: Option<f64>| match v {
                Some(v) => format!("{:.3}", v),
                None => "-".to_string(),
            };
            let _ = writeln!(
                out,
                "{:<22} {:<12} {:>9.1} {:>8} {:>12} {:>12}",
                col.name,
                kind,
                col.missing_percentage,
                col.unique_count,
                fmt_opt(col.mean),
                fmt_opt(col.std),
            );
        }
        let _ = writeln!(out);

        let with_missing: Vec<_> = report
            .column_profiles
            .iter()
            .filter(|c| c.missing_count > 0)
            .collect();
        let _ = writeln!(out, "Missing / unknown counts (cols with >0):");
        if with_missing.is_empty() {
            let _ = writeln!(out, "  none");
        } else {
            for col in with_missing {
                let _ = writeln!(out, "  {:<22} {}", col.name, col.missing_count);
            }
        }
        let _ = writeln!(out);

        if !report.correlations.is_empty() {
            let _ = writeln!(out, "Correlations (numeric pairs):");
            for (a, b, r) in &report.correlations {
                let _ = writeln!(out, "  {:<22} {:<22} {:+.4}", a, b, r);
            }
            let _ = writeln!(out);
        }

        let skewed: Vec<_> = report
            .column_profiles
            .iter()
            .filter_map(|c| c.skewness.map(|s| (c.name.as_str(), s)))
            .collect();
        if !skewed.is_empty() {
            let _ = writeln!(out, "Skewness (numeric cols):");
            let mut skewed = skewed;
            skewed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            for (name, skew) in skewed {
                let _ = writeln!(out, "  {:<22} {:+.4}", name, skew);
            }
            let _ = writeln!(out);
        }

        if let Some(balance) = &report.target_balance {
            let _ = writeln!(out, "Target class balance (y):");
            for (class, count) in balance {
                let _ = writeln!(out, "  {:<22} {}", class, count);
            }
            let _ = writeln!(out);
        }

        if !report.notes.is_empty() {
            let _ = writeln!(out, "Notes:");
            for note in &report.notes {
                let _ = writeln!(out, "  - {}", note);
            }
        }

        out
    }

    /// Write all plot artifacts; failures become notes, never errors.
    fn write_plots(
        &self,
        df: &DataFrame,
        schema: &TableSchema,
        config: &PipelineConfig,
        plots_dir: &std::path::Path,
        notes: &mut Vec<String>,
    ) {
        for col_name in schema
            .numeric_columns()
            .into_iter()
            .take(config.max_plot_columns)
        {
            if let Err(e) = Self::write_histogram(df, col_name, plots_dir) {
                warn!("Could not produce histogram for '{}': {}", col_name, e);
                notes.push(format!("Could not produce histogram for '{}'", col_name));
            }
        }

        if let Err(e) = Self::write_missingness(df, schema, plots_dir) {
            warn!("Could not produce missingness overview: {}", e);
            notes.push("Could not produce missingness overview".to_string());
        }
    }

    /// Render a text histogram of one numeric column.
    fn write_histogram(
        df: &DataFrame,
        col_name: &str,
        plots_dir: &std::path::Path,
    ) -> Result<()> {
        let col = df
            .column(col_name)
            .map_err(|_| PrepError::ColumnNotFound(col_name.to_string()))?;
        let values = numeric_values(col.as_materialized_series())?;
        if values.is_empty() {
            return Err(PrepError::ReportGenerationFailed(format!(
                "column '{}' has no observed values",
                col_name
            )));
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = if max > min { max - min } else { 1.0 };

        let mut counts = vec![0usize; HISTOGRAM_BINS];
        for v in &values {
            let idx = (((v - min) / width) * HISTOGRAM_BINS as f64) as usize;
            counts[idx.min(HISTOGRAM_BINS - 1)] += 1;
        }
        let peak = counts.iter().copied().max().unwrap_or(1).max(1);

        let mut out = String::new();
        let _ = writeln!(out, "Histogram: {}", col_name);
        let _ = writeln!(out, "n={} min={:.3} max={:.3}", values.len(), min, max);
        let _ = writeln!(out);
        for (i, count) in counts.iter().enumerate() {
            let lo = min + width * i as f64 / HISTOGRAM_BINS as f64;
            let hi = min + width * (i + 1) as f64 / HISTOGRAM_BINS as f64;
            let bar = "#".repeat(count * BAR_WIDTH / peak);
            let _ = writeln!(out, "[{:>12.3}, {:>12.3}) {:>7} |{}", lo, hi, count, bar);
        }

        fs::write(plots_dir.join(format!("hist_{}.txt", col_name)), out)?;
        Ok(())
    }

    /// Render a per-row missingness overview for the first rows of the table.
    ///
    /// Each row is a line of '.' (present) and 'x' (missing) per schema
    /// column; `"unknown"` cells in categorical columns count as missing.
    fn write_missingness(
        df: &DataFrame,
        schema: &TableSchema,
        plots_dir: &std::path::Path,
    ) -> Result<()> {
        let mut col_names: Vec<&str> = schema.numeric_columns();
        col_names.extend(schema.categorical_columns());
        col_names.retain(|n| df.column(n).is_ok());

        let rows = df.height().min(MISSINGNESS_ROWS);
        let mut out = String::new();
        let _ = writeln!(out, "Missingness overview (first {} rows)", rows);
        let _ = writeln!(out, "Columns: {}", col_names.join(", "));
        let _ = writeln!(out);

        for i in 0..rows {
            let mut line = String::with_capacity(col_names.len());
            for name in &col_names {
                let col = df.column(name)?;
                let value = col.get(i)?;
                let missing = value.is_null()
                    || (schema.kind(name) == Some(ColumnKind::Categorical)
                        && value.to_string().contains(crate::cleaner::MISSING_SENTINEL));
                line.push(if missing { 'x' } else { '.' });
            }
            let _ = writeln!(out, "{:>5} {}", i, line);
        }

        fs::write(plots_dir.join("missingness.txt"), out)?;
        Ok(())
    }
}
