// ==============================================================================
// schema.rs - Ordered Field-Descriptor Transform Engine
// ==============================================================================
// Description: Shared tabular-to-JSON transform driven by per-format schemas
// Author: Matt Barham
// Created: 2026-07-27
// Modified: 2026-08-05
// Version: 1.0.0
// ==============================================================================
// Both QC converters declare a fixed, ordered list of FieldSpec entries and
// feed rows through convert_row. Output key order is the schema's declaration
// order, never the input file's column order.
// ==============================================================================

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

use crate::models::QcRecord;

/// First contiguous run of ASCII digits within an identifier segment
static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Errors raised while transforming a row against a schema
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("missing expected column '{0}'")]
    MissingColumn(String),

    #[error("invalid integer in column '{column}': '{value}'")]
    InvalidInteger { column: String, value: String },

    #[error("invalid float in column '{column}': '{value}'")]
    InvalidFloat { column: String, value: String },

    #[error("no plate id found in library id '{0}'")]
    InvalidLibraryId(String),

    #[error("no plate id suffix in run name '{0}'")]
    InvalidRunName(String),
}

/// What to do when a numeric coercion fails.
///
/// Applies to the `Integer` and `Float` transforms only; identifier and
/// missing-column errors are always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// Store null under the source column name and continue
    ToNull,
    /// Abort the whole conversion
    Fatal,
}

/// How one input column maps into the output record
#[derive(Debug, Clone, Copy)]
pub enum Transform {
    /// Copy the raw value as a string under the source column name
    Verbatim,
    /// Copy the raw value as a string under a different key
    Rename(&'static str),
    /// Integer coercion
    Integer,
    /// Float coercion; a failure null keeps the source column name even
    /// when `rename_to` is set
    Float { rename_to: Option<&'static str> },
    /// Comma-separated flag tokens emitted as a list of strings
    FlagList,
    /// Dash-delimited sample identifier: emits `library_id`, `plate_id` and
    /// (when the converter supplies one) `run_id`
    LibraryId,
    /// Run name with a trailing plate suffix: emits `plate_id` and `run_id`
    RunName,
    /// Column is consumed but contributes no output key
    Discard,
}

/// One entry of a converter's ordered schema table
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Input column name
    pub column: &'static str,
    /// Output mapping for the column
    pub transform: Transform,
    /// Numeric-coercion failure policy for this column
    pub on_parse_failure: ParseFailure,
}

/// Transform one input row into a QC record.
///
/// Fields are visited in schema order. A raw cell equal to the literal "NA"
/// stores null under the source column name and skips the transform entirely,
/// including for `Discard` columns.
pub fn convert_row(
    fields: &[FieldSpec],
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
    run_id: Option<&str>,
) -> Result<QcRecord, TransformError> {
    let mut record = QcRecord::new();

    for spec in fields {
        let index = headers
            .iter()
            .position(|h| h == spec.column)
            .ok_or_else(|| TransformError::MissingColumn(spec.column.to_string()))?;
        let raw = row
            .get(index)
            .ok_or_else(|| TransformError::MissingColumn(spec.column.to_string()))?;

        if raw == "NA" {
            record.insert(spec.column.to_string(), Value::Null);
            continue;
        }

        match spec.transform {
            Transform::Verbatim => {
                record.insert(spec.column.to_string(), Value::from(raw));
            }
            Transform::Rename(output) => {
                record.insert(output.to_string(), Value::from(raw));
            }
            Transform::Integer => match raw.trim().parse::<i64>() {
                Ok(value) => {
                    record.insert(spec.column.to_string(), Value::from(value));
                }
                Err(_) => match spec.on_parse_failure {
                    ParseFailure::ToNull => {
                        record.insert(spec.column.to_string(), Value::Null);
                    }
                    ParseFailure::Fatal => {
                        return Err(TransformError::InvalidInteger {
                            column: spec.column.to_string(),
                            value: raw.to_string(),
                        });
                    }
                },
            },
            Transform::Float { rename_to } => match raw.trim().parse::<f64>() {
                Ok(value) => {
                    let output = rename_to.unwrap_or(spec.column);
                    record.insert(output.to_string(), Value::from(value));
                }
                Err(_) => match spec.on_parse_failure {
                    ParseFailure::ToNull => {
                        record.insert(spec.column.to_string(), Value::Null);
                    }
                    ParseFailure::Fatal => {
                        return Err(TransformError::InvalidFloat {
                            column: spec.column.to_string(),
                            value: raw.to_string(),
                        });
                    }
                },
            },
            Transform::FlagList => {
                let flags: Vec<Value> = raw.split(',').map(Value::from).collect();
                record.insert(spec.column.to_string(), Value::from(flags));
            }
            Transform::LibraryId => {
                record.insert("library_id".to_string(), Value::from(raw));
                let plate_id = plate_id_from_library_id(raw)?;
                record.insert("plate_id".to_string(), Value::from(plate_id));
                if let Some(run_id) = run_id {
                    record.insert("run_id".to_string(), Value::from(run_id));
                }
            }
            Transform::RunName => {
                let (run_id, plate_id) = split_run_name(raw)?;
                record.insert("plate_id".to_string(), Value::from(plate_id));
                record.insert("run_id".to_string(), Value::from(run_id));
            }
            Transform::Discard => {}
        }
    }

    Ok(record)
}

/// Extract the plate id embedded in a dash-delimited library id.
///
/// Control samples ("POS-..."/"NEG-...") carry the plate id in the third
/// dash segment, clinical samples in the second. The plate id is the first
/// run of digits within that segment.
pub fn plate_id_from_library_id(library_id: &str) -> Result<u32, TransformError> {
    let segment_index = if library_id.starts_with("POS") || library_id.starts_with("NEG") {
        2
    } else {
        1
    };

    let segment = library_id
        .split('-')
        .nth(segment_index)
        .ok_or_else(|| TransformError::InvalidLibraryId(library_id.to_string()))?;

    RE_DIGITS
        .find(segment)
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .ok_or_else(|| TransformError::InvalidLibraryId(library_id.to_string()))
}

/// Split an ncov-tools run name into (run_id, plate_id).
///
/// The plate id is the text after the final underscore; the run id is
/// everything before it. A value with no underscore keeps an empty run id
/// and must itself parse as the plate id.
pub fn split_run_name(run_name: &str) -> Result<(String, u32), TransformError> {
    let (run_id, plate) = match run_name.rsplit_once('_') {
        Some((head, tail)) => (head.to_string(), tail),
        None => (String::new(), run_name),
    };

    let plate_id = plate
        .trim()
        .parse::<u32>()
        .map_err(|_| TransformError::InvalidRunName(run_name.to_string()))?;

    Ok((run_id, plate_id))
}
