// ==============================================================================
// plates-by-run.rs - Plate Discovery Entry Point
// ==============================================================================
// Description: Reports which sample plates were processed in each run
// Author: Matt Barham
// Created: 2026-07-28
// Modified: 2026-08-05
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ncov_qc_processor::plates;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Parent directory holding per-run analysis directories
    #[arg(long, default_value = "/projects/covid-19_production/analysis_by_run")]
    analysis_parent_dir: PathBuf,

    /// Version of the artic pipeline output directory to read
    #[arg(long, default_value = "1.3")]
    artic_output_version: String,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ncov_qc_processor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let records = plates::discover(&args.analysis_parent_dir, &args.artic_output_version)
        .with_context(|| {
            format!(
                "Failed to discover plates under {}",
                args.analysis_parent_dir.display()
            )
        })?;

    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
