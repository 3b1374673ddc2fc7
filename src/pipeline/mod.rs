//! Pipeline orchestration.
//!
//! Sequences the stages in their fixed order: load, profile/report, clean,
//! engineer + scale, persist. Each stage consumes its input table and
//! produces a new one; there is no partial-failure recovery across stages.

use crate::cleaner::Cleaner;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::FeatureEngineer;
use crate::fetch;
use crate::profiler::Profiler;
use crate::reporting::ReportGenerator;
use crate::schema::TableSchema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    /// Shape of the raw dataset (rows, columns).
    pub shape_before: (usize, usize),
    /// Shape of the processed dataset (rows, columns).
    pub shape_after: (usize, usize),
    /// Path of the written processed dataset.
    pub output_path: PathBuf,
    /// Audit trail of transform actions, in execution order.
    pub processing_steps: Vec<String>,
}

/// Runs the full preparation pipeline.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Execute the pipeline end to end and persist the processed dataset.
    pub fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        std::fs::create_dir_all(&self.config.output_dir)?;

        info!("Ensuring dataset is available...");
        let df = fetch::ensure_data(&self.config)?;
        let shape_before = df.shape();
        let schema = TableSchema::from_dataframe(&df);

        if self.config.generate_reports {
            info!("Running EDA...");
            let report = Profiler::profile(&df, &schema)?;
            let generator = ReportGenerator::new(&self.config.output_dir);
            generator.write_all(&df, &schema, &report, &self.config)?;
        }

        let mut steps = Vec::new();

        info!("Cleaning data...");
        let df = Cleaner::clean(df, &schema, self.config.iqr_multiplier, &mut steps)?;

        info!("Engineering features and scaling...");
        let df = FeatureEngineer::create_features_and_scale(df, &schema, &mut steps)?;

        let output_path = self.config.processed_path();
        Self::write_csv(df.clone(), &output_path)?;
        info!("Processed dataset written to {}", output_path.display());

        Ok(RunSummary {
            duration_ms: started.elapsed().as_millis() as u64,
            shape_before,
            shape_after: df.shape(),
            output_path,
            processing_steps: steps,
        })
    }

    /// Run the transform chain over an already-loaded table.
    ///
    /// Skips acquisition, reporting and persistence; used by callers that
    /// manage their own I/O.
    pub fn process(&self, df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let schema = TableSchema::from_dataframe(&df);
        let mut steps = Vec::new();
        let df = Cleaner::clean(df, &schema, self.config.iqr_multiplier, &mut steps)?;
        let df = FeatureEngineer::create_features_and_scale(df, &schema, &mut steps)?;
        Ok((df, steps))
    }

    fn write_csv(mut df: DataFrame, path: &std::path::Path) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        Ok(())
    }
}
