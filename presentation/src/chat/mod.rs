//! Interactive chat module
//!
//! Provides a readline-based chat interface over the session controller.

mod command;
mod presenter;
mod repl;

pub use command::ChatCommand;
pub use presenter::ChatPresenter;
pub use repl::ChatRepl;
