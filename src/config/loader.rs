//! Reading pagination options from JSON strings and TOML files

use super::{LayoutConfig, PaginationOptions};
use crate::error::ConfigurationError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a configuration source
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path:?}: {reason}")]
    Toml { path: PathBuf, reason: String },

    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}

impl LayoutConfig {
    /// Parse camelCase JSON options, as passed across the WASM bridge
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let options: PaginationOptions = serde_json::from_str(json)?;
        Ok(Self::resolve(options)?)
    }

    /// Parse TOML options (same camelCase keys as JSON)
    pub fn from_toml_str(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let options: PaginationOptions = toml::from_str(source).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::resolve(options)?)
    }
}

/// Load a configuration file, choosing JSON or TOML by extension
pub fn load_file(path: &Path) -> Result<LayoutConfig, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => LayoutConfig::from_json_str(&source),
        _ => LayoutConfig::from_toml_str(&source, path),
    }
}
