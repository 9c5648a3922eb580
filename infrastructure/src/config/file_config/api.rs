//! Backend API configuration from TOML (`[api]` section)

use serde::{Deserialize, Serialize};

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Raw API configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Connect timeout in seconds
    pub connect_timeout_seconds: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 120,
            connect_timeout_seconds: 10,
        }
    }
}
