// ==============================================================================
// parsers/mod.rs - QC report parser modules
// ==============================================================================
// Description: Parsers for pipeline QC report formats
// Author: Matt Barham
// Created: 2026-07-27
// Modified: 2026-08-05
// Version: 1.0.0
// ==============================================================================

pub mod artic_qc;
pub mod ncov_tools;

pub use artic_qc::{run_id_from_path, ArticQcError, ArticQcParser};
pub use ncov_tools::{NcovToolsQcError, NcovToolsQcParser};
