//! RAG Gateway port
//!
//! Defines the interface for talking to the RAG backend: workspace
//! provisioning and indexing, document upload, queries, provider selection
//! and session cleanup.

use async_trait::async_trait;
use ragdesk_domain::{
    IndexStats, PendingUpload, ProviderSelection, ProviderStatus, QueryAnswer, QueryOptions,
    Question, UploadReceipt,
};
use thiserror::Error;

/// Errors that can occur during backend gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Non-success HTTP status; `message` is the backend's detail when it sent one
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Cannot read {path}: {reason}")]
    LocalFile { path: String, reason: String },

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Whether the request never reached the backend or timed out
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::ConnectionError(_) | GatewayError::Timeout
        )
    }
}

/// Gateway to the RAG backend
///
/// This port defines how the application layer talks to the backend.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait RagGateway: Send + Sync {
    /// Provision the workspace for a session; idempotent on `session_id`.
    ///
    /// Returns the workspace id.
    async fn ensure_workspace(&self, session_id: &str) -> Result<String, GatewayError>;

    /// Trigger a (re)build of the workspace index
    async fn build_workspace(
        &self,
        workspace_id: &str,
        force: bool,
    ) -> Result<IndexStats, GatewayError>;

    /// Ingest one file into the workspace
    async fn upload_document(
        &self,
        workspace_id: &str,
        upload: &PendingUpload,
        auto_build: bool,
    ) -> Result<UploadReceipt, GatewayError>;

    /// Ask a question against a workspace's documents
    async fn query_workspace(
        &self,
        workspace_id: &str,
        question: &Question,
        options: &QueryOptions,
    ) -> Result<QueryAnswer, GatewayError>;

    /// Ask a question against the shared corpus
    async fn query_global(
        &self,
        question: &Question,
        options: &QueryOptions,
        session_id: Option<&str>,
    ) -> Result<QueryAnswer, GatewayError>;

    /// Select the active LLM provider by backend name
    async fn select_provider(&self, provider: &str) -> Result<ProviderSelection, GatewayError>;

    /// Probe the active provider and its readiness
    async fn provider_status(&self) -> Result<ProviderStatus, GatewayError>;

    /// Destroy the session's server-side resources
    async fn cleanup_session(
        &self,
        session_id: &str,
        wipe_messages: bool,
    ) -> Result<(), GatewayError>;
}
