//! Logging configuration from TOML (`[logging]` section)

use super::storage::expand_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL conversation log path; disabled when unset
    pub conversation_log: Option<String>,
    /// Diagnostic log file; logs go to stderr when unset
    pub file: Option<String>,
}

impl FileLoggingConfig {
    pub fn conversation_log_path(&self) -> Option<PathBuf> {
        self.conversation_log
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(expand_home)
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.file
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(expand_home)
    }
}
