//! Local storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// State file path; defaults to `$XDG_DATA_HOME/ragdesk/state.json`
    pub path: Option<String>,
}

impl FileStorageConfig {
    /// Resolved state file path, expanding a leading `~`
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match self.path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Some(expand_home(path)),
            _ => dirs::data_dir().map(|d| d.join("ragdesk").join("state.json")),
        }
    }
}

pub(super) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
