use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::model::{ConnectionSpec, FileConfig};
use crate::error::{Result, WaitError};

/// Everything the binary needs once flags, environment and `.env` have been merged.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Batch file; when set it replaces the single target.
    pub file: Option<PathBuf>,
    /// Target assembled from individual flags.
    pub target: ConnectionSpec,
    pub debug: bool,
    /// Command to run once every target is available.
    pub command: Vec<String>,
}

impl AppConfig {
    /// The list of targets to wait for, read from the batch file when one is configured.
    pub fn connection_specs(&self) -> Result<Vec<ConnectionSpec>> {
        match &self.file {
            Some(path) => Ok(load_file_config(path)?.configs),
            None => Ok(vec![self.target.clone()]),
        }
    }
}

/// Reads a batch file. `.yml`/`.yaml` files are parsed as YAML, anything else as JSON.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let config_load = |reason: String| WaitError::ConfigLoad {
        path: path.to_path_buf(),
        reason,
    };

    let contents = fs::read_to_string(path).map_err(|e| config_load(e.to_string()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));

    let config: FileConfig = if is_yaml {
        serde_yaml::from_str(&contents).map_err(|e| config_load(e.to_string()))?
    } else {
        serde_json::from_str(&contents).map_err(|e| config_load(e.to_string()))?
    };

    tracing::debug!(path = %path.display(), targets = config.configs.len(), "Loaded batch config");
    Ok(config)
}

/// Parses `Name: value` header arguments into a map. Later duplicates win.
pub fn parse_headers<S: AsRef<str>>(raw: &[S]) -> std::result::Result<HashMap<String, String>, String> {
    raw.iter()
        .map(|entry| {
            let entry = entry.as_ref();
            match entry.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Ok((name.trim().to_string(), value.trim().to_string()))
                }
                _ => Err(format!("invalid header `{entry}`, expected `Name: value`")),
            }
        })
        .collect()
}
