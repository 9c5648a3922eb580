//! UI event types emitted by the SessionController for presentation rendering
//!
//! These events form the output port from the application layer to the
//! presentation layer. Transcript changes and ephemeral notices travel on
//! separate variants so a front end can route them to different surfaces.

use ragdesk_domain::{ClientSession, ConversationTurn};

/// Events emitted by the SessionController
#[derive(Debug, Clone)]
pub enum UiEvent {
    // === Transcript channel ===
    /// A turn was appended (user message, answer, advisory or error advisory)
    TurnAppended(ConversationTurn),
    /// The transcript was replaced wholesale (new chat or restored snapshot)
    TranscriptReplaced(Vec<ConversationTurn>),

    // === Notification channel ===
    /// Short transient notice; never part of the transcript
    Notice(String),

    // === State ===
    /// A request started or finished; front ends may disable conflicting actions
    BusyChanged(bool),
    /// Session identity, workspace binding, source mode or provider changed
    SessionChanged(ClientSession),
    /// The local history collection changed
    HistoryChanged { entries: usize },
}

impl UiEvent {
    /// Whether the event belongs to the conversation transcript
    pub fn is_transcript(&self) -> bool {
        matches!(
            self,
            UiEvent::TurnAppended(_) | UiEvent::TranscriptReplaced(_)
        )
    }
}
