//! Client session entity

use super::value_objects::{ProviderKind, Readiness, SourceMode};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a client session.
///
/// `Uninitialized → Bootstrapping → Ready`; ending the session returns to
/// `Uninitialized`. Source mode and provider readiness toggle inside `Ready`
/// without going back through `Bootstrapping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Bootstrapping,
    Ready,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Uninitialized => write!(f, "uninitialized"),
            SessionPhase::Bootstrapping => write!(f, "bootstrapping"),
            SessionPhase::Ready => write!(f, "ready"),
        }
    }
}

/// Where a query is routed, resolved from the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    /// Workspace-scoped query; the workspace id doubles as the session id on the wire
    Workspace { workspace_id: String },
    /// Global query; the session id is sent when known
    Global { session_id: Option<String> },
}

/// Per-profile conversation identity (Entity)
///
/// Holds the opaque session id, the optional workspace binding, the source
/// mode and the provider selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSession {
    session_id: Option<String>,
    workspace_id: Option<String>,
    source_mode: SourceMode,
    provider: ProviderKind,
    readiness: Readiness,
    phase: SessionPhase,
}

impl ClientSession {
    pub fn new(source_mode: SourceMode, provider: ProviderKind) -> Self {
        Self {
            source_mode,
            provider,
            ..Self::default()
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    pub fn source_mode(&self) -> SourceMode {
        self.source_mode
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn has_workspace(&self) -> bool {
        self.workspace_id.is_some()
    }

    pub fn bind_session(&mut self, session_id: impl Into<String>) {
        self.session_id = Some(session_id.into());
    }

    pub fn bind_workspace(&mut self, workspace_id: impl Into<String>) {
        self.workspace_id = Some(workspace_id.into());
    }

    pub fn set_provider(&mut self, provider: ProviderKind, readiness: Readiness) {
        self.provider = provider;
        self.readiness = readiness;
    }

    /// Switch the source mode.
    ///
    /// Switching to [`SourceMode::Workspace`] fails while no workspace is bound.
    pub fn set_source_mode(&mut self, mode: SourceMode) -> Result<(), DomainError> {
        if mode.requires_workspace() && self.workspace_id.is_none() {
            return Err(DomainError::WorkspaceUnbound);
        }
        self.source_mode = mode;
        Ok(())
    }

    /// Resolve where the next query goes.
    pub fn query_scope(&self) -> Result<QueryScope, DomainError> {
        match self.source_mode {
            SourceMode::Workspace => self
                .workspace_id
                .clone()
                .map(|workspace_id| QueryScope::Workspace { workspace_id })
                .ok_or(DomainError::WorkspaceUnbound),
            SourceMode::Global => Ok(QueryScope::Global {
                session_id: self.session_id.clone(),
            }),
        }
    }

    pub fn begin_bootstrap(&mut self) {
        self.phase = SessionPhase::Bootstrapping;
    }

    pub fn mark_ready(&mut self) {
        self.phase = SessionPhase::Ready;
    }

    /// Drop session and workspace identity and return to `Uninitialized`.
    ///
    /// Source mode and provider selection are kept.
    pub fn clear_identity(&mut self) {
        self.session_id = None;
        self.workspace_id = None;
        self.phase = SessionPhase::Uninitialized;
    }
}
