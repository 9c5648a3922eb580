//! Workspace build and upload results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Corpus statistics reported after an index (re)build.
///
/// Values are passed through verbatim; a missing value is shown as `?`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStats {
    pub total_chunks: Option<u64>,
    pub total_vectors: Option<u64>,
}

impl IndexStats {
    fn show(value: Option<u64>) -> String {
        value.map_or_else(|| "?".to_string(), |v| v.to_string())
    }

    pub fn chunks_display(&self) -> String {
        Self::show(self.total_chunks)
    }

    pub fn vectors_display(&self) -> String {
        Self::show(self.total_vectors)
    }
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chunks: {}, vectors: {}",
            self.chunks_display(),
            self.vectors_display()
        )
    }
}

/// Acknowledgement of a document upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadReceipt {
    pub filename: String,
    pub status: Option<String>,
}
