//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod account;
pub mod admin_console;
pub mod history_browser;
pub mod history_store;
pub mod session_controller;
