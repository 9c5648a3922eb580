//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Unknown source mode: {0}")]
    UnknownSourceMode(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("No workspace is bound to this session")]
    WorkspaceUnbound,

    #[error("No session identifier is known")]
    SessionUnbound,
}

impl DomainError {
    /// Check if this error is a precondition on the session state
    /// (as opposed to a parsing error on user input)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DomainError::WorkspaceUnbound | DomainError::SessionUnbound
        )
    }
}
