//! Error types for the data preparation pipeline.
//!
//! A single `thiserror`-based hierarchy covers everything from dataset
//! acquisition to the core transform chain. Contract violations (a transform
//! invoked with its documented preconditions unmet) are fatal and carry a
//! descriptive reason; they signal a misordered pipeline, not bad data.

use thiserror::Error;

/// The main error type for the preparation pipeline.
#[derive(Error, Debug)]
pub enum PrepError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A transform was invoked with its preconditions unmet.
    #[error("Contract violation in {stage}: {reason}")]
    ContractViolation { stage: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dataset download failed.
    #[error("Failed to download dataset from {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Archive extraction failed.
    #[error("Archive extraction failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error.
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
}

impl PrepError {
    /// Build a contract-violation error for a named pipeline stage.
    pub fn contract(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        PrepError::ContractViolation {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Check whether this error is a contract violation.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;
