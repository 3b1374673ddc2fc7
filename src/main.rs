//! CLI entry point for the data preparation pipeline.

use anyhow::{anyhow, Result};
use bankprep::{Pipeline, PipelineConfig, RunSummary};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data preparation pipeline for the UCI Bank Marketing dataset",
    long_about = "Loads the UCI Bank Marketing dataset (downloading it on first run),\n\
                  writes an exploratory report and plot artifacts, cleans the data\n\
                  (missing values and outlier capping), engineers derived features,\n\
                  standardizes numeric columns and writes processed.csv.\n\n\
                  EXAMPLES:\n  \
                  # Full run with defaults\n  \
                  bankprep\n\n  \
                  # Custom locations, no report artifacts\n  \
                  bankprep --data-dir cache --output results --skip-reports"
)]
struct Args {
    /// Directory for the downloaded/extracted dataset
    #[arg(short, long, default_value = "data")]
    data_dir: String,

    /// Output directory for the processed dataset and reports
    #[arg(short, long, default_value = "outputs")]
    output: String,

    /// Dataset archive URL (downloaded when the local cache is absent)
    #[arg(long)]
    url: Option<String>,

    /// IQR fence multiplier for outlier capping
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Skip the EDA report and plot artifacts
    #[arg(long)]
    skip_reports: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "error" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let mut builder = PipelineConfig::builder()
        .data_dir(&args.data_dir)
        .output_dir(&args.output)
        .iqr_multiplier(args.iqr_multiplier)
        .generate_reports(!args.skip_reports);

    if let Some(ref url) = args.url {
        builder = builder.data_url(url);
    }

    let config = builder
        .build()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!("Starting data preparation pipeline...");
    let summary = Pipeline::new(config).run()?;

    if !args.quiet {
        print_summary(&summary);
    }
    Ok(())
}

/// Print a human-readable completion summary.
///
/// Uses `println!` intentionally: this is the primary CLI output and should
/// be visible regardless of log level.
fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "=".repeat(70));
    println!("PREPARATION COMPLETE");
    println!("{}", "=".repeat(70));
    println!(
        "Input:  {} rows x {} columns",
        summary.shape_before.0, summary.shape_before.1
    );
    println!(
        "Output: {} ({} rows x {} columns)",
        summary.output_path.display(),
        summary.shape_after.0,
        summary.shape_after.1
    );
    println!("Duration: {}ms", summary.duration_ms);

    if !summary.processing_steps.is_empty() {
        println!();
        println!("Actions Taken:");
        for step in summary.processing_steps.iter().take(10) {
            println!("  - {}", step);
        }
        if summary.processing_steps.len() > 10 {
            println!(
                "  ... and {} more actions",
                summary.processing_steps.len() - 10
            );
        }
    }
    println!("{}", "=".repeat(70));
}
