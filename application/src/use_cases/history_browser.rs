//! History browser use case.
//!
//! Read-only access to the transcripts the backend stores per session, for
//! the admin history view. A stored transcript can be converted into turns
//! and opened in chat through
//! [`SessionController::replace_transcript`](super::session_controller::SessionController::replace_transcript).

use crate::ports::admin_gateway::AdminGateway;
use crate::ports::rag_gateway::GatewayError;
use ragdesk_domain::{ConversationTurn, SessionSummary, StoredMessage};
use std::sync::Arc;
use tracing::debug;

/// Default page size when listing sessions
pub const DEFAULT_SESSION_LIMIT: usize = 500;

/// Default page size when fetching a transcript
pub const DEFAULT_MESSAGE_LIMIT: usize = 2000;

/// Use case for browsing server-side chat history.
pub struct HistoryBrowser<A: AdminGateway + 'static> {
    gateway: Arc<A>,
}

impl<A: AdminGateway + 'static> HistoryBrowser<A> {
    pub fn new(gateway: Arc<A>) -> Self {
        Self { gateway }
    }

    /// List the most recent sessions, up to `limit`.
    pub async fn list_sessions(&self, limit: usize) -> Result<Vec<SessionSummary>, GatewayError> {
        let sessions = self.gateway.list_sessions(limit, 0).await?;
        debug!("Fetched {} sessions", sessions.len());
        Ok(sessions)
    }

    /// Keep the sessions whose id, start date or email contain `needle`.
    ///
    /// An empty needle keeps everything.
    pub fn filter_sessions<'a>(
        sessions: &'a [SessionSummary],
        needle: &str,
    ) -> Vec<&'a SessionSummary> {
        sessions.iter().filter(|s| s.matches(needle)).collect()
    }

    /// Stored transcript of one session.
    pub async fn messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, GatewayError> {
        let messages = self.gateway.session_messages(session_id, limit, 0).await?;
        debug!(session_id, "Fetched {} messages", messages.len());
        Ok(messages)
    }

    /// Convert a stored transcript into conversation turns.
    pub fn to_turns(messages: Vec<StoredMessage>) -> Vec<ConversationTurn> {
        messages.into_iter().map(ConversationTurn::from).collect()
    }
}
