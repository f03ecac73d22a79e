use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::urgency::DEFAULT_UPCOMING_DAYS;

pub const CONFIG_VERSION: u64 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("marktodo")
        .join("config.json")
}

fn default_extensions() -> Vec<String> {
    vec!["md".into(), "markdown".into()]
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct MarkTodoConfig {
    pub version: u64,
    pub debug_logging: bool,
    /// Deadlines at least this many days away are not yet urgent.
    pub upcoming_days: i64,
    /// File extensions picked up when a directory is scanned.
    pub extensions: Vec<String>,
}

impl Default for MarkTodoConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            debug_logging: false,
            upcoming_days: DEFAULT_UPCOMING_DAYS,
            extensions: default_extensions(),
        }
    }
}

impl MarkTodoConfig {
    /// Read the config at `path`. A missing file is not an error and yields
    /// the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(e.into()))?;
        std::fs::write(path, json).map_err(write_err)?;
        log::info!("wrote config to {}", path.display());
        Ok(())
    }

    /// Whether `path` has one of the configured extensions (case-insensitive).
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}
