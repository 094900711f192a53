//! Source tree walker.
//!
//! Enumerates candidate bot source files under a root, skipping the usual
//! non-source directories (virtualenvs, caches, VCS metadata). One
//! unreadable file degrades the scan with a warning; it never aborts it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::{PermScanError, Result};

/// Extensions treated as bot source.
pub const SOURCE_EXTENSIONS: &[&str] = &["py", "pyw"];

/// Directory names never descended into. Hidden directories are skipped
/// by the walker itself.
pub const EXCLUDED_DIRS: &[&str] = &[
    "venv",
    "env",
    "__pycache__",
    "node_modules",
    "site-packages",
    "dist-packages",
    "build",
    "dist",
    "egg-info",
];

/// Files larger than this are skipped; real bot source never gets close.
const MAX_FILE_BYTES: u64 = 1_048_576;

/// A readable source file selected by the walk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

/// Outcome of one walk: the files to scan plus non-fatal warnings.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<SourceFile>,
    pub warnings: Vec<String>,
    /// Files matched by the allow-list but skipped (unreadable, oversized).
    pub skipped: usize,
}

/// Walk `root` and read every matching source file.
///
/// Visitation order is sorted by path, so repeated walks of an unchanged
/// tree yield identical results. Each call is a fresh walk.
pub fn collect_source_files(root: &Path, config: &ScanConfig) -> Result<WalkOutcome> {
    if !root.exists() {
        return Err(PermScanError::PathNotFound(root.to_path_buf()));
    }

    let mut excluded: HashSet<String> = EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect();
    excluded.extend(config.exclude.iter().cloned());

    let mut extensions: HashSet<String> =
        SOURCE_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    extensions.extend(config.extensions.iter().map(|e| e.to_lowercase()));

    let walker = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .sort_by_file_path(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if !is_dir {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !excluded.contains(name.as_ref())
        })
        .build();

    let mut outcome = WalkOutcome::default();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                outcome.warnings.push(format!("walk error: {e}"));
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !extensions.contains(&ext) {
            continue;
        }

        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > MAX_FILE_BYTES => {
                outcome.warnings.push(format!(
                    "skipping oversized file {} ({} bytes)",
                    path.display(),
                    meta.len()
                ));
                outcome.skipped += 1;
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                outcome
                    .warnings
                    .push(format!("could not stat {}: {e}", path.display()));
                outcome.skipped += 1;
                continue;
            }
        }

        match std::fs::read_to_string(path) {
            Ok(content) => outcome.files.push(SourceFile {
                path: path.to_path_buf(),
                content,
            }),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "unreadable file skipped");
                outcome
                    .warnings
                    .push(format!("could not read {}: {e}", path.display()));
                outcome.skipped += 1;
            }
        }
    }

    Ok(outcome)
}
