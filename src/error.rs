use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PermScanError>;

#[derive(Error, Debug)]
pub enum PermScanError {
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Invalid client id {0:?}: expected a non-empty numeric snowflake")]
    InvalidClientId(String),

    #[error("No permission source provided: pass an explicit bitmask, permission names, or a directory to scan")]
    NoPermissionSource,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl PermScanError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
