//! Presentation-level configuration
//!
//! Configuration for REPL behavior.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Show a spinner while waiting on the backend
    pub show_progress: bool,
    /// Show retrieved passages under each answer
    pub show_hits: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            show_hits: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Line-editor history file; defaults to `$XDG_DATA_HOME/ragdesk/history.txt`
    pub fn history_path(&self) -> Option<PathBuf> {
        match self.history_file.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => dirs::data_dir().map(|p| p.join("ragdesk").join("history.txt")),
        }
    }
}
