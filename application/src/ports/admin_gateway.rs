//! Admin and account gateway ports
//!
//! Read paths for the server-side history, dashboard actions, and the
//! cookie-based authentication calls. The backend owns all of it; these
//! traits only describe the calls the client makes.

use super::rag_gateway::GatewayError;
use async_trait::async_trait;
use ragdesk_domain::{SessionSummary, StoredMessage, UserProfile};
use serde_json::Value;

/// Gateway for the admin surface
#[async_trait]
pub trait AdminGateway: Send + Sync {
    /// List server-side sessions
    async fn list_sessions(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SessionSummary>, GatewayError>;

    /// Fetch the stored transcript of a session
    async fn session_messages(
        &self,
        session_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<StoredMessage>, GatewayError>;

    /// Corpus and usage statistics, as a free-form JSON object
    async fn stats(&self) -> Result<Value, GatewayError>;

    /// Rebuild the global index
    async fn reindex(&self) -> Result<Value, GatewayError>;

    /// Delete the global index artifacts
    async fn flush_index(&self) -> Result<Value, GatewayError>;
}

/// Gateway for authentication calls.
///
/// Credentials are carried as cookies by the adapter; no token handling
/// happens in the client.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, GatewayError>;

    async fn signup(&self, email: &str, password: &str) -> Result<UserProfile, GatewayError>;

    async fn logout(&self) -> Result<(), GatewayError>;

    /// The signed-in user, or `None` when not authenticated
    async fn me(&self) -> Result<Option<UserProfile>, GatewayError>;
}
