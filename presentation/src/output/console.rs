//! Console output formatter for transcripts, history and admin data

use colored::Colorize;
use ragdesk_application::ProviderNames;
use ragdesk_domain::util::short_id;
use ragdesk_domain::{
    ClientSession, ConversationSnapshot, ConversationTurn, Hit, Role, SessionSummary,
    StoredMessage,
};
use serde_json::Value;

/// Maximum characters of a passage excerpt under an answer
const EXCERPT_CHARS: usize = 160;

/// Formats chat data for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one transcript turn
    pub fn format_turn(turn: &ConversationTurn, show_hits: bool) -> String {
        if turn.is_user() {
            return format!("{} {}", "you ›".blue().bold(), turn.content);
        }
        if turn.is_error {
            return format!("{} {}", "❌".red(), turn.content.red());
        }

        let mut output = Self::render_emphasis(&turn.content);
        if show_hits && !turn.hits.is_empty() {
            output.push('\n');
            output.push_str(&Self::format_hits(&turn.hits));
        }
        output
    }

    /// Format retrieved passages as a numbered source list
    pub fn format_hits(hits: &[Hit]) -> String {
        let mut output = format!("{}\n", "Sources:".cyan().bold());
        for (i, hit) in hits.iter().enumerate() {
            let score = hit
                .score
                .map(|s| format!(" ({:.2})", s))
                .unwrap_or_default();
            output.push_str(&format!(
                "  [{}] {} · {}{}\n",
                i + 1,
                hit.display_subject().bold(),
                hit.display_source().dimmed(),
                score.dimmed()
            ));

            let excerpt = hit.content.split_whitespace().collect::<Vec<_>>().join(" ");
            if !excerpt.is_empty() {
                let short = ragdesk_domain::util::truncate_chars(&excerpt, EXCERPT_CHARS);
                let ellipsis = if short.len() < excerpt.len() { "…" } else { "" };
                output.push_str(&format!("      {}{}\n", short.dimmed(), ellipsis.dimmed()));
            }
        }
        output
    }

    /// Render `**bold**` spans with terminal emphasis
    pub fn render_emphasis(text: &str) -> String {
        let parts: Vec<&str> = text.split("**").collect();
        // An odd number of markers leaves the text as written
        if parts.len() % 2 == 0 {
            return text.to_string();
        }
        parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                if i % 2 == 1 {
                    part.bold().to_string()
                } else {
                    part.to_string()
                }
            })
            .collect()
    }

    /// One-line summary of the session state
    pub fn format_status(
        session: &ClientSession,
        providers: &ProviderNames,
        user: Option<&str>,
    ) -> String {
        let session_id = session.session_id().map(short_id).unwrap_or("—");
        let workspace = session.workspace_id().map(short_id).unwrap_or("—");
        let readiness = match session.readiness() {
            r if r.is_ready() => r.as_str().green(),
            r => r.as_str().yellow(),
        };
        format!(
            "{} {}  {} {}  {} {}  {} {} ({})  {} {}",
            "session".dimmed(),
            session_id,
            "workspace".dimmed(),
            workspace,
            "source".dimmed(),
            session.source_mode().as_str().cyan(),
            "llm".dimmed(),
            providers.label(session.provider()),
            readiness,
            "user".dimmed(),
            user.unwrap_or("anonymous")
        )
    }

    /// Numbered list of local history entries
    pub fn format_snapshots(snapshots: &[ConversationSnapshot]) -> String {
        if snapshots.is_empty() {
            return "No saved conversations.".dimmed().to_string();
        }
        let mut output = String::new();
        for (i, snapshot) in snapshots.iter().enumerate() {
            output.push_str(&format!(
                "  {:>3}. {}  {}  {}\n",
                i + 1,
                snapshot.title.bold(),
                snapshot.subtitle.dimmed(),
                format!("{} turns", snapshot.turn_count()).dimmed()
            ));
        }
        output
    }

    /// Table of server-side sessions
    pub fn format_sessions(sessions: &[&SessionSummary]) -> String {
        if sessions.is_empty() {
            return "No sessions found.".dimmed().to_string();
        }
        let mut output = format!(
            "{}\n",
            format!("{:<38} {:<20} {:<28} {:>8}", "SESSION", "STARTED", "EMAIL", "MESSAGES")
                .bold()
        );
        for session in sessions {
            output.push_str(&format!(
                "{:<38} {:<20} {:<28} {:>8}\n",
                session.id,
                session.started_at.as_deref().unwrap_or("—"),
                session.email.as_deref().unwrap_or("—"),
                session
                    .message_count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "?".to_string())
            ));
        }
        output.push_str(&format!("{} session(s)", sessions.len()).dimmed().to_string());
        output
    }

    /// A stored transcript
    pub fn format_messages(messages: &[StoredMessage]) -> String {
        if messages.is_empty() {
            return "No messages.".dimmed().to_string();
        }
        let mut output = String::new();
        for message in messages {
            let role = match message.role {
                Role::User => "user".blue().bold(),
                Role::Assistant => "assistant".green().bold(),
            };
            let at = message
                .created_at
                .as_deref()
                .map(|t| format!(" {}", t.dimmed()))
                .unwrap_or_default();
            output.push_str(&format!("{}{}\n{}\n\n", role, at, message.content));
        }
        output
    }

    /// Key/value rendering of a free-form statistics object
    pub fn format_stats(stats: &Value) -> String {
        match stats {
            Value::Object(map) if !map.is_empty() => {
                let width = map.keys().map(|k| k.len()).max().unwrap_or(0);
                map.iter()
                    .map(|(key, value)| {
                        let value = match value {
                            Value::String(s) => s.clone(),
                            Value::Object(_) | Value::Array(_) => {
                                serde_json::to_string_pretty(value).unwrap_or_default()
                            }
                            other => other.to_string(),
                        };
                        format!("{:<width$}  {}", key.cyan(), value, width = width)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| "{}".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragdesk_domain::{ProviderKind, Readiness, SourceMode};
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_emphasis_strips_markers() {
        plain();
        assert_eq!(
            ConsoleFormatter::render_emphasis("Workspace ready: **sess-123**."),
            "Workspace ready: sess-123."
        );
        assert_eq!(ConsoleFormatter::render_emphasis("2 ** 3"), "2 ** 3");
    }

    #[test]
    fn test_answer_lists_sources() {
        plain();
        let turn = ConversationTurn::answer(
            "X is a letter.",
            vec![Hit {
                subject: None,
                source: Some("C:\\docs\\doc.pdf".to_string()),
                content: "X is   the 24th\nletter".to_string(),
                score: Some(0.714),
            }],
            None,
        );
        let output = ConsoleFormatter::format_turn(&turn, true);
        assert!(output.contains("[1] Information · doc.pdf (0.71)"));
        assert!(output.contains("X is the 24th letter"));

        let bare = ConsoleFormatter::format_turn(&turn, false);
        assert!(!bare.contains("Sources:"));
    }

    #[test]
    fn test_error_turn_is_marked() {
        plain();
        let output = ConsoleFormatter::format_turn(&ConversationTurn::error("boom"), true);
        assert_eq!(output, "❌ boom");
    }

    #[test]
    fn test_status_line() {
        plain();
        let mut session = ClientSession::new(SourceMode::Global, ProviderKind::Local);
        session.bind_session("0123456789abcdef");
        session.set_provider(ProviderKind::Cloud, Readiness::NotReady);

        let line = ConsoleFormatter::format_status(&session, &ProviderNames::default(), None);
        assert!(line.contains("session 01234567"));
        assert!(line.contains("workspace —"));
        assert!(line.contains("cloud (groq) (not ready)"));
        assert!(line.contains("anonymous"));
    }

    #[test]
    fn test_stats_key_values() {
        plain();
        let output = ConsoleFormatter::format_stats(&json!({ "total_chunks": 42, "provider": "ollama" }));
        assert!(output.contains("total_chunks  42"));
        assert!(output.contains("provider"));
        assert!(output.contains("ollama"));
    }
}
