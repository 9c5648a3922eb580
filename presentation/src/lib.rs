//! Presentation layer for ragdesk
//!
//! This crate contains CLI definitions, console formatters,
//! the progress spinner and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatCommand, ChatPresenter, ChatRepl};
pub use cli::commands::{Cli, Command};
pub use config::ReplConfig;
pub use output::console::ConsoleFormatter;
pub use progress::spinner::Spinner;
