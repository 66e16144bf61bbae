// ==============================================================================
// artic_qc.rs - Artic Pipeline QC Report Parser
// ==============================================================================
// Description: Converts artic variant-calling QC reports to normalized records
// Author: Matt Barham
// Created: 2026-07-27
// Modified: 2026-08-05
// Version: 1.0.0
// ==============================================================================
// Format: Comma-delimited with header
// Example:
//   sample_name,pct_N_bases,pct_covered_bases,longest_no_N_run,num_aligned_reads,fasta,bam,qc_pass
//   AB-3-9,0.01,95.2,29500,120000,AB-3-9.fasta,AB-3-9.bam,PASS
// ==============================================================================

use csv::ReaderBuilder;
use std::path::Path;
use thiserror::Error;

use crate::models::QcRecord;
use crate::schema::{convert_row, FieldSpec, ParseFailure, Transform, TransformError};

/// Ordered schema for the artic QC report.
///
/// The pct_N_bases and qc_pass columns are read but contribute nothing to
/// the output record; a raw "NA" in either still emits a null under the
/// column name.
const ARTIC_QC_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        column: "sample_name",
        transform: Transform::LibraryId,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "pct_N_bases",
        transform: Transform::Discard,
        on_parse_failure: ParseFailure::ToNull,
    },
    FieldSpec {
        column: "pct_covered_bases",
        transform: Transform::Float {
            rename_to: Some("genome_completeness"),
        },
        on_parse_failure: ParseFailure::ToNull,
    },
    FieldSpec {
        column: "longest_no_N_run",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::ToNull,
    },
    FieldSpec {
        column: "num_aligned_reads",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::ToNull,
    },
    FieldSpec {
        column: "fasta",
        transform: Transform::Verbatim,
        on_parse_failure: ParseFailure::ToNull,
    },
    FieldSpec {
        column: "bam",
        transform: Transform::Verbatim,
        on_parse_failure: ParseFailure::ToNull,
    },
    FieldSpec {
        column: "qc_pass",
        transform: Transform::Discard,
        on_parse_failure: ParseFailure::ToNull,
    },
];

/// Errors that can occur during artic QC conversion
#[derive(Error, Debug)]
pub enum ArticQcError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Parser for artic pipeline QC reports
pub struct ArticQcParser;

impl ArticQcParser {
    /// Parse an artic QC report into normalized records.
    ///
    /// # Arguments
    /// * `path` - Path to the comma-delimited QC report
    /// * `run_id` - Run identifier stamped onto every record
    ///
    /// # Returns
    /// * `Ok(Vec<QcRecord>)` - One record per input row, in input order
    /// * `Err(ArticQcError)` - Fatal conversion error, no partial output
    pub fn parse(path: impl AsRef<Path>, run_id: &str) -> Result<Vec<QcRecord>, ArticQcError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path.as_ref())?;

        let headers = reader.headers()?.clone();
        let mut records = Vec::new();

        for result in reader.records() {
            let row = result?;
            let record = convert_row(ARTIC_QC_FIELDS, &headers, &row, Some(run_id))?;
            records.push(record);
        }

        Ok(records)
    }
}

/// Derive a run id from a QC report path: the base name up to the first dot
/// (e.g., "200101_V1.qc.csv" -> "200101_V1").
pub fn run_id_from_path(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}
