//! Domain layer for ragdesk
//!
//! This crate contains the entities and value objects of the chat client.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Client Session
//!
//! A [`ClientSession`] is the per-profile conversation identity: an opaque
//! session id, an optional workspace binding, the selected [`SourceMode`] and
//! the LLM [`ProviderKind`] with its [`Readiness`].
//!
//! ## Conversation
//!
//! - **Turns**: an append-only sequence of [`ConversationTurn`]s, optionally
//!   carrying retrieval [`Hit`]s and the raw context blob
//! - **Snapshots**: archived transcripts kept locally as [`ConversationSnapshot`]s

pub mod backend;
pub mod conversation;
pub mod core;
pub mod session;
pub mod upload;
pub mod util;

// Re-export commonly used types
pub use backend::{
    admin::{SessionSummary, StoredMessage, UserProfile},
    answer::{QueryAnswer, QueryOptions},
    provider::{ProviderSelection, ProviderStatus},
    workspace::{IndexStats, UploadReceipt},
};
pub use conversation::{
    snapshot::{ConversationSnapshot, UNTITLED_CONVERSATION},
    turn::{ConversationTurn, Hit, Role},
};
pub use core::{error::DomainError, question::Question};
pub use session::{
    entities::{ClientSession, QueryScope, SessionPhase},
    value_objects::{ProviderKind, Readiness, SourceMode},
};
pub use upload::PendingUpload;
