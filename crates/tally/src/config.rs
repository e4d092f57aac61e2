//! Configuration file support.
//!
//! Loads optional `<config dir>/tally/config.toml`. Every key is optional.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Currency of new books and of amounts typed without one
    pub currency: String,
    /// Book opened when none is given on the command line
    pub book: Option<PathBuf>,
    /// Prompt prefix
    pub prompt: String,
    /// Keep a line history between sessions
    pub history: bool,
    /// Save unsaved changes on `quit`
    pub autosave: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            book: None,
            prompt: "tally".to_string(),
            history: true,
            autosave: true,
        }
    }
}

/// Directory holding the config file and the line history.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tally"))
}

/// Default location of the config file.
pub fn default_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Default location of the line history.
pub fn history_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("history"))
}

impl Config {
    /// Load `path`, or the default config file when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Self {
        match path.map(Path::to_path_buf).or_else(default_path) {
            Some(path) => Self::load_from_path(&path),
            None => Self::default(),
        }
    }

    /// Load config from a specific path.
    /// Returns the default config if the file doesn't exist or is invalid.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    config
                }
                Err(e) => {
                    tracing::warn!("failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
