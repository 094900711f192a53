use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration from `.permscan.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub invite: InviteConfig,
}

/// Scan behavior: what to visit and whether heuristics count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Include permissions inferred from method-call heuristics.
    #[serde(default = "default_true")]
    pub include_inferred: bool,
    /// Directory names to exclude, on top of the built-in list.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Extra file extensions to treat as source.
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// Invite URL defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteConfig {
    /// OAuth2 scopes requested by generated invite links.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_scopes() -> Vec<String> {
    crate::invite::DEFAULT_SCOPES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include_inferred: true,
            exclude: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            scopes: default_scopes(),
        }
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# permscan configuration

[scan]
# Count permissions inferred from discord.py method calls, not just
# explicitly declared ones.
include_inferred = true

# Directory names to skip, on top of the built-in excludes.
# exclude = ["generated"]

# Extra file extensions to scan as source.
# extensions = ["pyi"]

[invite]
# OAuth2 scopes for generated invite links.
scopes = ["bot", "applications.commands"]
"#
    }
}
