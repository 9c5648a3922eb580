//! Output formatting for terminal display

pub mod console;
