// ==============================================================================
// plates.rs - Plate Discovery Across Sequencing Runs
// ==============================================================================
// Description: Maps sequencing runs to the sample plates they processed
// Author: Matt Barham
// Created: 2026-07-28
// Modified: 2026-08-05
// Version: 1.0.0
// ==============================================================================

use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::models::PlateRunRecord;

/// Run directory naming convention: six digits, underscore, then the
/// instrument letter (V or M)
static RE_RUN_DIR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6}_[VM]").unwrap());

/// Errors that can occur during plate discovery
#[derive(Error, Debug)]
pub enum PlateDiscoveryError {
    #[error("failed to scan {dir}: {source}")]
    ScanError {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read QC report {path}: {source}")]
    QcFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no plate id in library id '{library_id}' ({path})")]
    InvalidLibraryId { library_id: String, path: PathBuf },
}

/// Whether a directory name follows the sequencing-run naming convention
pub fn is_run_dir_name(name: &str) -> bool {
    RE_RUN_DIR.is_match(name)
}

/// Expected location of a run's artic QC report
pub fn artic_qc_path(parent: &Path, run_id: &str, artic_output_version: &str) -> PathBuf {
    parent
        .join(run_id)
        .join(format!("ncov2019-artic-nf-v{artic_output_version}-output"))
        .join(format!("{run_id}.qc.csv"))
}

/// List run ids under the analysis parent directory, lexicographically sorted
pub fn list_run_ids(parent: &Path) -> Result<Vec<String>, PlateDiscoveryError> {
    let mut run_ids = Vec::new();

    for entry in WalkDir::new(parent).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| PlateDiscoveryError::ScanError {
            dir: parent.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_run_dir_name(&name) {
            run_ids.push(name.into_owned());
        }
    }

    run_ids.sort();
    Ok(run_ids)
}

/// Collect the distinct plate ids named by one run's QC report.
///
/// The first line is a header and is skipped; a header-only or empty report
/// contributes nothing. Control samples (POS/NEG prefixes) are excluded from
/// plate accounting.
fn plate_ids_from_qc(contents: &str, path: &Path) -> Result<BTreeSet<u32>, PlateDiscoveryError> {
    let mut plate_ids = BTreeSet::new();

    for line in contents.lines().skip(1) {
        let library_id = line.trim().split(',').next().unwrap_or("");
        if library_id.starts_with("POS") || library_id.starts_with("NEG") {
            continue;
        }
        let plate_id = library_id
            .split('-')
            .nth(1)
            .and_then(|segment| segment.trim().parse::<u32>().ok())
            .ok_or_else(|| PlateDiscoveryError::InvalidLibraryId {
                library_id: library_id.to_string(),
                path: path.to_path_buf(),
            })?;
        plate_ids.insert(plate_id);
    }

    Ok(plate_ids)
}

/// Build plate records for the given runs, reading each run's QC report
/// through `read_qc`.
///
/// Runs whose reports name no non-control plates are omitted entirely. Any
/// unreadable report aborts the whole pass.
pub fn collect_plates_by_run<F>(
    parent: &Path,
    run_ids: &[String],
    artic_output_version: &str,
    read_qc: F,
) -> Result<Vec<PlateRunRecord>, PlateDiscoveryError>
where
    F: Fn(&Path) -> std::io::Result<String>,
{
    let mut records = Vec::new();

    for run_id in run_ids {
        let path = artic_qc_path(parent, run_id, artic_output_version);
        let contents = read_qc(&path).map_err(|e| PlateDiscoveryError::QcFileError {
            path: path.clone(),
            source: e,
        })?;

        let plate_ids = plate_ids_from_qc(&contents, &path)?;
        debug!("Run {} names plates {:?}", run_id, plate_ids);

        if !plate_ids.is_empty() {
            records.push(PlateRunRecord {
                run_id: run_id.clone(),
                plate_ids: plate_ids.into_iter().collect(),
            });
        }
    }

    Ok(records)
}

/// Discover plates for every run under the analysis parent directory
pub fn discover(
    parent: &Path,
    artic_output_version: &str,
) -> Result<Vec<PlateRunRecord>, PlateDiscoveryError> {
    let run_ids = list_run_ids(parent)?;
    info!("Found {} run directories under {:?}", run_ids.len(), parent);

    let records = collect_plates_by_run(parent, &run_ids, artic_output_version, |path| {
        std::fs::read_to_string(path)
    })?;
    info!("{} runs with at least one non-control plate", records.len());

    Ok(records)
}
