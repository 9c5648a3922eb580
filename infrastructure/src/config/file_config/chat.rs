//! Chat behaviour configuration from TOML (`[chat]` section)

use ragdesk_domain::QueryOptions;
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
///
/// Enum-valued fields are kept as strings and parsed during conversion so a
/// typo surfaces as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Number of passages retrieved per query
    pub top_k: usize,
    /// Minimum similarity score of a retrieved passage
    pub min_score: f64,
    /// Ask the backend to return the assembled context
    pub include_context: bool,
    /// Provider used when nothing is remembered ("local" or "cloud")
    pub fallback_provider: String,
    /// Source mode at startup ("workspace" or "global")
    pub default_source: String,
    /// Maximum characters of a history entry title
    pub title_max_chars: usize,
    /// Rebuild the workspace index after each upload
    pub auto_build_on_upload: bool,
    /// Wipe stored messages when ending a session
    pub wipe_messages_on_end: bool,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        let query = QueryOptions::default();
        Self {
            top_k: query.top_k,
            min_score: query.min_score,
            include_context: query.include_context,
            fallback_provider: "local".to_string(),
            default_source: "workspace".to_string(),
            title_max_chars: 40,
            auto_build_on_upload: true,
            wipe_messages_on_end: false,
        }
    }
}

impl FileChatConfig {
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            top_k: self.top_k,
            min_score: self.min_score,
            include_context: self.include_context,
        }
    }
}
