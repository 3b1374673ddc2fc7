//! Configuration for the data preparation pipeline.
//!
//! Dataset URL and output locations are explicit configuration passed to the
//! loader and orchestrator, never process-wide state. Built with the builder
//! pattern for ergonomic setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default UCI Bank Marketing archive URL.
pub const DEFAULT_DATA_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/00222/bank-additional.zip";

/// Path of the CSV inside the extracted archive, relative to the data dir.
pub const DATA_FILE_RELATIVE: &str = "bank-additional/bank-additional-full.csv";

/// Configuration for the preparation pipeline.
///
/// Use [`PipelineConfig::builder()`] to construct one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// URL of the zip archive to download when the local cache is absent.
    pub data_url: String,

    /// Directory holding the downloaded/extracted dataset.
    /// Default: "data"
    pub data_dir: PathBuf,

    /// Output directory for the processed dataset and reports.
    /// Default: "outputs"
    pub output_dir: PathBuf,

    /// IQR fence multiplier for outlier capping.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Maximum number of numeric columns to render plot artifacts for.
    /// Default: 8
    pub max_plot_columns: usize,

    /// Whether to write the EDA report and plot artifacts.
    /// Default: true
    pub generate_reports: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("outputs"),
            iqr_multiplier: 1.5,
            max_plot_columns: 8,
            generate_reports: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Absolute path of the cached dataset CSV.
    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE_RELATIVE)
    }

    /// Path of the processed output CSV.
    pub fn processed_path(&self) -> PathBuf {
        self.output_dir.join("processed.csv")
    }

    /// Directory for plot artifacts.
    pub fn plots_dir(&self) -> PathBuf {
        self.output_dir.join("plots")
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }
        if self.data_url.is_empty() {
            return Err(ConfigValidationError::EmptyDataUrl);
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be a positive finite number)")]
    InvalidIqrMultiplier(f64),

    #[error("Dataset URL must not be empty")]
    EmptyDataUrl,
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    data_url: Option<String>,
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    iqr_multiplier: Option<f64>,
    max_plot_columns: Option<usize>,
    generate_reports: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Set the dataset archive URL.
    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = Some(url.into());
        self
    }

    /// Set the directory for the downloaded/extracted dataset.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Set the output directory for reports and the processed dataset.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the IQR fence multiplier used for outlier capping.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Set the maximum number of numeric columns to plot.
    pub fn max_plot_columns(mut self, n: usize) -> Self {
        self.max_plot_columns = Some(n);
        self
    }

    /// Enable or disable report and plot generation.
    pub fn generate_reports(mut self, generate: bool) -> Self {
        self.generate_reports = Some(generate);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            data_url: self.data_url.unwrap_or_else(|| DEFAULT_DATA_URL.to_string()),
            data_dir: self.data_dir.unwrap_or_else(|| PathBuf::from("data")),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("outputs")),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(1.5),
            max_plot_columns: self.max_plot_columns.unwrap_or(8),
            generate_reports: self.generate_reports.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
