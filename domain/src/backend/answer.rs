//! Query options and answers

use crate::conversation::turn::{ConversationTurn, Hit};
use serde::{Deserialize, Serialize};

/// Retrieval parameters sent with every query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Maximum number of hits (`k` on the wire)
    pub top_k: usize,
    /// Minimum similarity score for a hit to be kept
    pub min_score: f64,
    /// Ask the backend to return the raw context blob
    pub include_context: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            top_k: 6,
            min_score: 0.3,
            include_context: true,
        }
    }
}

/// Answer to a workspace or global query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryAnswer {
    pub answer: String,
    pub hits: Vec<Hit>,
    pub context: Option<String>,
    /// Session id minted by the backend on a first global query
    pub session_id: Option<String>,
}

impl QueryAnswer {
    /// Convert into the assistant turn appended to the transcript
    pub fn into_turn(self) -> ConversationTurn {
        ConversationTurn::answer(self.answer, self.hits, self.context)
    }
}
