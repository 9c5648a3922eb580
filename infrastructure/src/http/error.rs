//! Error types for the HTTP adapter

use ragdesk_application::GatewayError;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for HTTP adapter operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur when talking to the backend over HTTP
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    Decode { error: String, raw: String },

    #[error("Cannot read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Classify a reqwest send/read failure
    pub fn from_request(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(error)
        }
    }

    /// Build a status error from a non-success response body.
    ///
    /// Prefers the backend's `detail` or `message` field, then the raw body,
    /// then the canonical reason phrase.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }

        let message = error_detail(body)
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "Request failed".to_string());

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// Extract a human-readable message from a JSON error body
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail").or_else(|| value.get("message"))?;
    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Null => None,
        // Validation errors arrive as a list of objects
        other => Some(other.to_string()),
    }
}

impl From<ApiError> for GatewayError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Transport(e) => GatewayError::ConnectionError(e.to_string()),
            ApiError::Timeout => GatewayError::Timeout,
            ApiError::Status { status, message } => GatewayError::Status { status, message },
            ApiError::Unauthorized => GatewayError::Unauthorized,
            ApiError::Decode { error, .. } => GatewayError::InvalidResponse(error),
            ApiError::File { path, source } => GatewayError::LocalFile {
                path,
                reason: source.to_string(),
            },
            e @ (ApiError::InvalidBaseUrl { .. } | ApiError::Client(_)) => {
                GatewayError::Other(e.to_string())
            }
        }
    }
}
