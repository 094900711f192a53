//! Structured scan results consumed by the output layer.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::Aggregate;
use crate::detect::Detection;
use crate::scanner::WalkOutcome;

/// Per-file slice of the scan, kept for reporting. Files with no
/// detections at all are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct FileBreakdown {
    pub file: PathBuf,
    pub declared: Vec<String>,
    pub inferred: Vec<String>,
    pub raw_values: Vec<u64>,
}

/// Complete result of scanning one source tree.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub files_with_errors: usize,
    pub aggregate: Aggregate,
    pub per_file: Vec<FileBreakdown>,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ScanReport {
    pub(crate) fn new(
        root: &Path,
        walk: WalkOutcome,
        detections: &[Detection],
        aggregate: Aggregate,
    ) -> Self {
        let mut warnings = walk.warnings;
        for det in detections {
            for name in &det.unknown {
                warnings.push(format!(
                    "unknown permission {:?} in {}",
                    name,
                    det.file.display()
                ));
            }
        }

        let per_file = detections
            .iter()
            .filter(|d| {
                !d.declared.is_empty() || !d.inferred.is_empty() || !d.raw_values.is_empty()
            })
            .map(|d| FileBreakdown {
                file: d.file.clone(),
                declared: d.declared.iter().cloned().collect(),
                inferred: d.inferred.iter().cloned().collect(),
                raw_values: d.raw_values.iter().copied().collect(),
            })
            .collect();

        Self {
            root: root.to_path_buf(),
            // Skipped files still matched the allow-list; they count as
            // scanned, with files_with_errors as the subset that failed.
            files_scanned: walk.files.len() + walk.skipped,
            files_with_errors: walk.skipped,
            aggregate,
            per_file,
            warnings,
            generated_at: Utc::now(),
        }
    }
}
