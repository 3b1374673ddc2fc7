//! Dataset acquisition and parsing.
//!
//! Ensures the UCI Bank Marketing CSV exists locally, downloading and
//! extracting the archive on first run, then parses the semicolon-delimited
//! file into a DataFrame. Network and extraction failures are fatal for the
//! run; there is no retry policy.

use crate::config::PipelineConfig;
use crate::error::{PrepError, Result};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/// Ensure the dataset CSV exists locally and load it.
///
/// Downloads and extracts the configured archive when the cached file is
/// absent, then parses it with `;` as the separator.
pub fn ensure_data(config: &PipelineConfig) -> Result<DataFrame> {
    let data_path = config.data_path();
    if !data_path.exists() {
        info!("Dataset not cached; downloading from {}", config.data_url);
        download_and_extract(&config.data_url, &config.data_dir)?;
        if !data_path.exists() {
            return Err(PrepError::DownloadFailed {
                url: config.data_url.clone(),
                reason: format!(
                    "archive did not contain expected file {}",
                    data_path.display()
                ),
            });
        }
    }
    read_semicolon_csv(&data_path)
}

/// Download a zip archive and extract it into `data_dir`.
pub fn download_and_extract(url: &str, data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;

    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = response.bytes()?;
    info!("Downloaded {} bytes, extracting...", bytes.len());

    let mut archive = ::zip::ZipArchive::new(Cursor::new(bytes))?;
    archive.extract(data_dir)?;
    info!("Extracted archive to {}", data_dir.display());
    Ok(())
}

/// Parse a semicolon-delimited CSV with headers and schema inference.
pub fn read_semicolon_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(b';')
                .with_quote_char(Some(b'"')),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    info!("Dataset loaded: {:?}", df.shape());
    Ok(df)
}
