//! Conversation turn entities

use serde::{Deserialize, Serialize};

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A retrieved document excerpt returned alongside an answer.
///
/// `score` is a similarity value, higher is better. It is usually in `[0, 1]`
/// but no bound is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hit {
    pub subject: Option<String>,
    pub source: Option<String>,
    pub content: String,
    pub score: Option<f64>,
}

impl Hit {
    /// Subject for display, defaulting to "Information"
    pub fn display_subject(&self) -> &str {
        self.subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Information")
    }

    /// File name of the source, with any directory prefix stripped
    pub fn display_source(&self) -> &str {
        let source = self
            .source
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("document");
        source.rsplit(['/', '\\']).next().unwrap_or(source)
    }
}

/// A single turn in the transcript (Entity)
///
/// Turns are never mutated once appended to a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// Raw retrieval context, kept for transparency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<Hit>,
    /// Error advisory; rendered with a leading marker
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            context: None,
            hits: Vec::new(),
            is_error: false,
        }
    }

    /// An assistant advisory or plain reply without retrieval data
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            ..Self::user(content)
        }
    }

    /// An assistant answer carrying hits and the raw context blob
    pub fn answer(content: impl Into<String>, hits: Vec<Hit>, context: Option<String>) -> Self {
        Self {
            hits,
            context,
            ..Self::assistant(content)
        }
    }

    /// An error-flagged assistant advisory
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(content)
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Whether this turn carries retrieval data worth an answer block
    pub fn has_retrieval(&self) -> bool {
        !self.hits.is_empty() || self.context.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert!(ConversationTurn::user("hi").is_user());
        assert!(!ConversationTurn::assistant("hello").is_user());
        assert!(ConversationTurn::error("boom").is_error);
        assert!(!ConversationTurn::assistant("ok").has_retrieval());
        assert!(ConversationTurn::answer("a", vec![], Some("ctx".into())).has_retrieval());
    }

    #[test]
    fn test_hit_display_source_strips_directories() {
        let hit = Hit {
            source: Some("C:\\docs\\reports/q3.pdf".to_string()),
            ..Hit::default()
        };
        assert_eq!(hit.display_source(), "q3.pdf");
        assert_eq!(Hit::default().display_source(), "document");
        assert_eq!(Hit::default().display_subject(), "Information");
    }

    #[test]
    fn test_turn_deserializes_minimal_json() {
        let turn: ConversationTurn =
            serde_json::from_str(r#"{"role":"assistant","content":"Bonjour"}"#).unwrap();
        assert_eq!(turn, ConversationTurn::assistant("Bonjour"));
    }

    #[test]
    fn test_hit_tolerates_missing_fields() {
        let hit: Hit = serde_json::from_str(r#"{"content":"excerpt","score":1.7}"#).unwrap();
        assert_eq!(hit.score, Some(1.7));
        assert!(hit.subject.is_none());
    }
}
