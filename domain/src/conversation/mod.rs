//! Conversation domain.
//!
//! - [`turn::ConversationTurn`] — one user or assistant message, with optional retrieval hits
//! - [`snapshot::ConversationSnapshot`] — an archived transcript kept in local history

pub mod snapshot;
pub mod turn;
