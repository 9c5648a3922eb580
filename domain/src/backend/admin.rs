//! Read models for the admin surface and the signed-in user

use crate::conversation::turn::{ConversationTurn, Role};
use serde::{Deserialize, Serialize};

/// A server-side chat session, as listed by the history browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSummary {
    pub id: String,
    pub started_at: Option<String>,
    pub email: Option<String>,
    pub message_count: Option<u64>,
}

impl SessionSummary {
    /// Case-insensitive match on id, start date or email
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [Some(self.id.as_str()), self.started_at.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A message stored server-side for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<StoredMessage> for ConversationTurn {
    fn from(message: StoredMessage) -> Self {
        match message.role {
            Role::User => ConversationTurn::user(message.content),
            Role::Assistant => ConversationTurn::assistant(message.content),
        }
    }
}

/// The authenticated user, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "user_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}
