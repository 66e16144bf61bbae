// ==============================================================================
// models.rs - QC Output Data Models
// ==============================================================================
// Description: Output record types shared by the QC conversion tools
// Author: Matt Barham
// Created: 2026-07-27
// Modified: 2026-08-05
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};

/// Normalized QC record produced by the converters.
///
/// An ordered mapping from output field name to value. Key order follows the
/// declaration order of the source schema table, not the input file's column
/// order, which is why `serde_json` runs with `preserve_order`.
pub type QcRecord = serde_json::Map<String, serde_json::Value>;

/// Plates processed within one sequencing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateRunRecord {
    /// Run directory name (e.g., "200101_V0123_analysis")
    pub run_id: String,

    /// Distinct plate ids seen in the run's QC report, ascending
    pub plate_ids: Vec<u32>,
}
