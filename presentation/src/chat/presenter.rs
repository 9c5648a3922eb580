//! Chat Presenter - Renders UiEvents to the terminal
//!
//! All println!/colored output of the chat REPL is concentrated here,
//! separating display from the session logic in the application layer.

use crate::ConsoleFormatter;
use colored::Colorize;
use ragdesk_application::UiEvent;
use tracing::trace;

/// Renders UiEvents to the terminal for the chat REPL
pub struct ChatPresenter {
    show_hits: bool,
}

impl Default for ChatPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatPresenter {
    pub fn new() -> Self {
        Self { show_hits: true }
    }

    pub fn with_hits(mut self, show: bool) -> Self {
        self.show_hits = show;
        self
    }

    /// Render a single UiEvent to the terminal
    pub fn render(&self, event: &UiEvent) {
        match event {
            // The user's own line is already on screen
            UiEvent::TurnAppended(turn) if turn.is_user() => {}
            UiEvent::TurnAppended(turn) => {
                println!("{}", ConsoleFormatter::format_turn(turn, self.show_hits));
                println!();
            }
            UiEvent::TranscriptReplaced(turns) => {
                println!("{}", "━".repeat(50).dimmed());
                for turn in turns {
                    println!("{}", ConsoleFormatter::format_turn(turn, self.show_hits));
                    println!();
                }
            }
            UiEvent::Notice(message) => {
                println!("{} {}", "›".yellow(), message.yellow());
            }
            UiEvent::HistoryChanged { entries } => {
                trace!(entries, "History changed");
            }
            UiEvent::BusyChanged(_) | UiEvent::SessionChanged(_) => {}
        }
    }
}
