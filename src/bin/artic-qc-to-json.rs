// ==============================================================================
// artic-qc-to-json.rs - Artic QC Conversion Entry Point
// ==============================================================================
// Description: Converts an artic pipeline QC report to JSON on stdout
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

use ncov_qc_processor::parsers::{run_id_from_path, ArticQcParser};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the artic pipeline QC report (comma-delimited)
    artic_qc: PathBuf,
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

    let run_id = run_id_from_path(&args.artic_qc);
    info!("Converting artic QC report {:?} (run {})", args.artic_qc, run_id);

    let records = ArticQcParser::parse(&args.artic_qc, &run_id)
        .with_context(|| format!("Failed to convert {}", args.artic_qc.display()))?;
    info!("Converted {} QC records", records.len());

    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
