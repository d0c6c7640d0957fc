//! Render settings.
//!
//! Loaded from a JSON file; every field is optional and falls back to its
//! default. Command line flags override whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("threads must be at least 1")]
    ZeroThreads,
}

/// Settings shared by phase and batch rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// User color preferences, see `ColorPreferences::parse`.
    pub colors: Vec<String>,
    /// Paint of the cross drawn on provinces whose order failed.
    pub failed_resolution_color: String,
    /// Worker threads for `render_history`.
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            colors: Vec::new(),
            failed_resolution_color: "#ff0000".to_string(),
            threads: 4,
        }
    }
}

impl RenderConfig {
    /// Reads a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// Parses config JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        if config.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(config)
    }
}
