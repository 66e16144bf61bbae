// ==============================================================================
// ncov_tools.rs - Ncov-Tools Summary QC Parser
// ==============================================================================
// Description: Converts ncov-tools summary QC reports to normalized records
// Author: Matt Barham
// Created: 2026-07-27
// Modified: 2026-08-05
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited with header, 19 columns
// Example:
//   sample	run_name	num_consensus_snvs	...	lineage	lineage_notes	watch_mutations
//   AB-3-9	200101_V1_analysis_7	8	...	B.1.1.7	note	S:N501Y
// ==============================================================================

use csv::ReaderBuilder;
use std::path::Path;
use thiserror::Error;

use crate::models::QcRecord;
use crate::schema::{convert_row, FieldSpec, ParseFailure, Transform, TransformError};

/// Ordered schema for the ncov-tools summary report.
///
/// Unlike the artic report, numeric columns here are trusted: a value that is
/// neither "NA" nor a well-formed number aborts the conversion.
const NCOV_TOOLS_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        column: "sample",
        transform: Transform::Rename("library_id"),
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "run_name",
        transform: Transform::RunName,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "num_consensus_snvs",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "num_consensus_n",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "num_consensus_iupac",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "num_variants_snvs",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "num_variants_indel",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "num_variants_indel_triplet",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "mean_sequencing_depth",
        transform: Transform::Float { rename_to: None },
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "median_sequencing_depth",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "qpcr_ct",
        transform: Transform::Float { rename_to: None },
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "collection_date",
        transform: Transform::Verbatim,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "num_weeks",
        transform: Transform::Integer,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "scaled_variants_snvs",
        transform: Transform::Float { rename_to: None },
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "genome_completeness",
        transform: Transform::Float { rename_to: None },
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "qc_pass",
        transform: Transform::FlagList,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "lineage",
        transform: Transform::Verbatim,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "lineage_notes",
        transform: Transform::Verbatim,
        on_parse_failure: ParseFailure::Fatal,
    },
    FieldSpec {
        column: "watch_mutations",
        transform: Transform::Verbatim,
        on_parse_failure: ParseFailure::Fatal,
    },
];

/// Errors that can occur during ncov-tools summary conversion
#[derive(Error, Debug)]
pub enum NcovToolsQcError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Parser for ncov-tools summary QC reports
pub struct NcovToolsQcParser;

impl NcovToolsQcParser {
    /// Parse an ncov-tools summary QC report into normalized records.
    ///
    /// # Arguments
    /// * `path` - Path to the tab-delimited summary report
    ///
    /// # Returns
    /// * `Ok(Vec<QcRecord>)` - One record per input row, in input order
    /// * `Err(NcovToolsQcError)` - Fatal conversion error, no partial output
    pub fn parse(path: impl AsRef<Path>) -> Result<Vec<QcRecord>, NcovToolsQcError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b'\t')
            .from_path(path.as_ref())?;

        let headers = reader.headers()?.clone();
        let mut records = Vec::new();

        for result in reader.records() {
            let row = result?;
            let record = convert_row(NCOV_TOOLS_FIELDS, &headers, &row, None)?;
            records.push(record);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const COLUMNS: &[&str] = &[
        "sample",
        "run_name",
        "num_consensus_snvs",
        "num_consensus_n",
        "num_consensus_iupac",
        "num_variants_snvs",
        "num_variants_indel",
        "num_variants_indel_triplet",
        "mean_sequencing_depth",
        "median_sequencing_depth",
        "qpcr_ct",
        "collection_date",
        "num_weeks",
        "scaled_variants_snvs",
        "genome_completeness",
        "qc_pass",
        "lineage",
        "lineage_notes",
        "watch_mutations",
    ];

    fn create_test_file(rows: &[&[&str]]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", COLUMNS.join("\t")).unwrap();
        for row in rows {
            writeln!(file, "{}", row.join("\t")).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn sample_row() -> Vec<&'static str> {
        vec![
            "AB-3-9",
            "200101_V1_analysis_7",
            "8",
            "3000",
            "2",
            "10",
            "1",
            "0",
            "512.7",
            "498",
            "21.4",
            "2021-01-05",
            "4",
            "1.25",
            "97.3",
            "PASS",
            "B.1.1.7",
            "note",
            "S:N501Y",
        ]
    }

    #[test]
    fn test_parse_valid_file() {
        let row = sample_row();
        let file = create_test_file(&[&row]);

        let records = NcovToolsQcParser::parse(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.get("library_id"), Some(&json!("AB-3-9")));
        assert_eq!(record.get("plate_id"), Some(&json!(7)));
        assert_eq!(record.get("run_id"), Some(&json!("200101_V1_analysis")));
        assert_eq!(record.get("num_consensus_snvs"), Some(&json!(8)));
        assert_eq!(record.get("num_consensus_n"), Some(&json!(3000)));
        assert_eq!(record.get("mean_sequencing_depth"), Some(&json!(512.7)));
        assert_eq!(record.get("median_sequencing_depth"), Some(&json!(498)));
        assert_eq!(record.get("qpcr_ct"), Some(&json!(21.4)));
        assert_eq!(record.get("collection_date"), Some(&json!("2021-01-05")));
        assert_eq!(record.get("genome_completeness"), Some(&json!(97.3)));
        assert_eq!(record.get("lineage"), Some(&json!("B.1.1.7")));
        assert_eq!(record.get("watch_mutations"), Some(&json!("S:N501Y")));
        assert!(!record.contains_key("sample"));
        assert!(!record.contains_key("run_name"));
    }

    #[test]
    fn test_qc_pass_becomes_flag_list() {
        let mut row = sample_row();
        row[15] = "PASS,INCOMPLETE_GENOME";
        let file = create_test_file(&[&row]);

        let records = NcovToolsQcParser::parse(file.path()).unwrap();
        assert_eq!(
            records[0].get("qc_pass"),
            Some(&json!(["PASS", "INCOMPLETE_GENOME"]))
        );
    }

    #[test]
    fn test_na_maps_to_null_under_source_name() {
        let mut row = sample_row();
        row[1] = "NA";
        row[10] = "NA";
        row[15] = "NA";
        let file = create_test_file(&[&row]);

        let records = NcovToolsQcParser::parse(file.path()).unwrap();
        let record = &records[0];
        assert_eq!(record.get("run_name"), Some(&Value::Null));
        assert!(!record.contains_key("plate_id"));
        assert!(!record.contains_key("run_id"));
        assert_eq!(record.get("qpcr_ct"), Some(&Value::Null));
        assert_eq!(record.get("qc_pass"), Some(&Value::Null));
    }

    #[test]
    fn test_bad_integer_is_fatal() {
        let mut row = sample_row();
        row[2] = "eight";
        let file = create_test_file(&[&row]);

        let result = NcovToolsQcParser::parse(file.path());
        assert!(matches!(
            result,
            Err(NcovToolsQcError::Transform(TransformError::InvalidInteger { column, .. }))
                if column == "num_consensus_snvs"
        ));
    }

    #[test]
    fn test_bad_float_is_fatal() {
        let mut row = sample_row();
        row[8] = "deep";
        let file = create_test_file(&[&row]);

        let result = NcovToolsQcParser::parse(file.path());
        assert!(matches!(
            result,
            Err(NcovToolsQcError::Transform(TransformError::InvalidFloat { column, .. }))
                if column == "mean_sequencing_depth"
        ));
    }

    #[test]
    fn test_bad_run_name_is_fatal() {
        let mut row = sample_row();
        row[1] = "200101_V1_analysis_seven";
        let file = create_test_file(&[&row]);

        let result = NcovToolsQcParser::parse(file.path());
        assert!(matches!(
            result,
            Err(NcovToolsQcError::Transform(TransformError::InvalidRunName(_)))
        ));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sample\trun_name").unwrap();
        writeln!(file, "AB-3-9\t200101_V1_analysis_7").unwrap();
        file.flush().unwrap();

        let result = NcovToolsQcParser::parse(file.path());
        assert!(matches!(
            result,
            Err(NcovToolsQcError::Transform(TransformError::MissingColumn(_)))
        ));
    }

    #[test]
    fn test_output_key_order_follows_schema() {
        let row = sample_row();
        let file = create_test_file(&[&row]);

        let records = NcovToolsQcParser::parse(file.path()).unwrap();
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "library_id",
                "plate_id",
                "run_id",
                "num_consensus_snvs",
                "num_consensus_n",
                "num_consensus_iupac",
                "num_variants_snvs",
                "num_variants_indel",
                "num_variants_indel_triplet",
                "mean_sequencing_depth",
                "median_sequencing_depth",
                "qpcr_ct",
                "collection_date",
                "num_weeks",
                "scaled_variants_snvs",
                "genome_completeness",
                "qc_pass",
                "lineage",
                "lineage_notes",
                "watch_mutations",
            ]
        );
    }
}
