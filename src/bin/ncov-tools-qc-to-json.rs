// ==============================================================================
// ncov-tools-qc-to-json.rs - Ncov-Tools QC Conversion Entry Point
// ==============================================================================
// Description: Converts an ncov-tools summary QC report to JSON on stdout
// Author: Matt Barham
// Created: 2026-07-27
// Modified: 2026-08-05
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ncov_qc_processor::parsers::NcovToolsQcParser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the ncov-tools summary QC report (tab-delimited)
    ncov_tools_summary_qc: PathBuf,
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

    info!("Converting ncov-tools summary {:?}", args.ncov_tools_summary_qc);

    let records = NcovToolsQcParser::parse(&args.ncov_tools_summary_qc)
        .with_context(|| format!("Failed to convert {}", args.ncov_tools_summary_qc.display()))?;
    info!("Converted {} QC records", records.len());

    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
