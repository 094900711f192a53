//! permscan — Discord bot permission scanner.
//!
//! Statically scans a bot's source tree for permission usage, folds the
//! detections into a single permission bitmask, and builds the OAuth2
//! invite URL for installing the bot. Detection is textual and
//! best-effort: it never parses, imports, or runs the scanned code.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use permscan::{scan_directory, ScanOptions};
//!
//! let report = scan_directory(Path::new("./my-bot"), &ScanOptions::default()).unwrap();
//! println!("permissions = {}", report.aggregate.bitmask);
//! ```

pub mod aggregate;
pub mod config;
pub mod detect;
pub mod error;
pub mod invite;
pub mod output;
pub mod report;
pub mod scanner;
pub mod table;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use config::Config;
use error::Result;
use invite::PermissionSource;
use report::ScanReport;

/// Options for a scan invocation.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Path to config file (defaults to `.permscan.toml` in the scan root).
    pub config_path: Option<PathBuf>,
    /// CLI override for whether method-call heuristics count toward the mask.
    pub include_inferred_override: Option<bool>,
    /// Extra directory names to exclude, on top of config and defaults.
    pub extra_excludes: Vec<String>,
}

/// Scan a source tree and fold every detection into one report.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> Result<ScanReport> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| root.join(".permscan.toml"));
    let mut config = Config::load(&config_path)?;

    config.scan.exclude.extend(options.extra_excludes.iter().cloned());
    if let Some(include_inferred) = options.include_inferred_override {
        config.scan.include_inferred = include_inferred;
    }

    let walk = scanner::collect_source_files(root, &config.scan)?;

    let detections: Vec<_> = walk
        .files
        .iter()
        .map(|f| detect::detect(&f.path, &f.content))
        .collect();

    let aggregate = aggregate::fold(detections.iter(), config.scan.include_inferred);

    Ok(ScanReport::new(root, walk, &detections, aggregate))
}

/// Everything needed to build one invite URL.
///
/// Exactly one permission source must be present; when several are,
/// `permissions` beats `permission_names` beats `root_path`.
#[derive(Debug, Clone, Default)]
pub struct InviteRequest<'a> {
    pub client_id: &'a str,
    /// Explicit bitmask, used verbatim.
    pub permissions: Option<u64>,
    /// Permission names resolved through the catalogue.
    pub permission_names: Option<&'a BTreeSet<String>>,
    /// Source tree to scan for the bitmask.
    pub root_path: Option<&'a Path>,
    /// OAuth2 scopes; defaults to `bot applications.commands`.
    pub scopes: Option<&'a [String]>,
    pub scan_options: ScanOptions,
}

/// Convenience entry point: resolve a bitmask from the request's
/// highest-priority permission source and build the invite URL.
///
/// The client id is validated up front: a bad id fails with
/// `InvalidClientId` no matter what else the request holds.
pub fn generate_invite_url(request: &InviteRequest<'_>) -> Result<String> {
    invite::validate_client_id(request.client_id)?;

    let mut sources = Vec::new();
    if let Some(mask) = request.permissions {
        sources.push(PermissionSource::Explicit(mask));
    }
    if let Some(names) = request.permission_names {
        sources.push(PermissionSource::Names(names));
    }
    if let Some(root) = request.root_path {
        sources.push(PermissionSource::ScanRoot(root));
    }

    let resolved = invite::resolve(&sources, &request.scan_options)?;
    if !resolved.dropped.is_empty() {
        tracing::warn!(
            dropped = resolved.dropped.len(),
            "permission names dropped from invite mask"
        );
    }

    let default_scopes = invite::default_scopes();
    let scopes = request.scopes.unwrap_or(&default_scopes);
    invite::build_invite_url(request.client_id, resolved.bitmask, scopes)
}
