//! Bank Marketing Data Preparation Pipeline
//!
//! A linear, single-pass preparation pipeline for the UCI Bank Marketing
//! dataset, built on Polars.
//!
//! # Overview
//!
//! The pipeline runs in a fixed order:
//!
//! - **Loader**: downloads and caches the semicolon-delimited dataset, parses
//!   it, and classifies every column into an explicit [`TableSchema`]
//! - **Profiler/Reporter**: descriptive statistics, a text/JSON EDA report
//!   and plot artifacts (read-only over the table)
//! - **Cleaner**: sentinel normalization, median/mode imputation, IQR
//!   winsorization
//! - **Feature Engineer**: `age_bucket`, `duration_log`,
//!   `campaign_prev_ratio`, plus standardization of all numeric columns
//! - **Orchestrator**: sequences the stages and persists `processed.csv`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bankprep::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .data_dir("data")
//!     .output_dir("outputs")
//!     .build()?;
//!
//! let summary = Pipeline::new(config).run()?;
//! println!("Wrote {}", summary.output_path.display());
//! ```
//!
//! Each stage consumes its input table and returns a new one. After
//! [`Cleaner::clean`] no column contains a missing value and no categorical
//! column contains the literal `"unknown"`; after
//! [`FeatureEngineer::create_features_and_scale`] the three engineered
//! columns exist and every numeric column is standardized.
//!
//! [`Cleaner::clean`]: cleaner::Cleaner::clean
//! [`FeatureEngineer::create_features_and_scale`]: features::FeatureEngineer::create_features_and_scale

pub mod cleaner;
pub mod config;
pub mod error;
pub mod features;
pub mod fetch;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod schema;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{Cleaner, DEFAULT_IQR_MULTIPLIER, EMPTY_COLUMN_FILL, MISSING_SENTINEL};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{PrepError, Result as PrepResult};
pub use features::FeatureEngineer;
pub use pipeline::{Pipeline, RunSummary};
pub use profiler::{ColumnProfile, EdaReport, Profiler};
pub use reporting::ReportGenerator;
pub use schema::{ColumnKind, TableSchema};
