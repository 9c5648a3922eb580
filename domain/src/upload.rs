//! Pending document uploads

use std::path::{Path, PathBuf};

/// A file selected for ingestion into the workspace.
///
/// Transient: exists only until its upload call resolves. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    path: PathBuf,
    display_name: String,
}

impl PendingUpload {
    /// Create an upload for a local file; the display name is its file name.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, display_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
