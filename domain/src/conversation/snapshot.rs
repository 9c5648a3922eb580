//! Archived conversation snapshots

use super::turn::ConversationTurn;
use crate::util::truncate_chars;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Title used when a transcript has no user turn
pub const UNTITLED_CONVERSATION: &str = "New conversation";

/// A transcript archived into local history.
///
/// Purely a client-side cache; never synced to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub snapshot: Vec<ConversationTurn>,
    /// Epoch milliseconds
    #[serde(default, rename = "createdAt")]
    pub created_at: i64,
}

impl ConversationSnapshot {
    /// Archive a transcript.
    ///
    /// The title is the first user turn truncated to `title_max_chars`
    /// characters, or [`UNTITLED_CONVERSATION`] when there is none.
    pub fn archive(turns: &[ConversationTurn], title_max_chars: usize, now: DateTime<Local>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: Self::derive_title(turns, title_max_chars),
            subtitle: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            snapshot: turns.to_vec(),
            created_at: now.timestamp_millis(),
        }
    }

    pub fn derive_title(turns: &[ConversationTurn], title_max_chars: usize) -> String {
        turns
            .iter()
            .find(|t| t.is_user())
            .map(|t| truncate_chars(t.content.trim(), title_max_chars).to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED_CONVERSATION.to_string())
    }

    pub fn turn_count(&self) -> usize {
        self.snapshot.len()
    }
}
