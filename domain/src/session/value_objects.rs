//! Session value objects: source mode, provider identity and readiness.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which document set a query is answered from.
///
/// `Workspace` requires a bound workspace id on the session; the controller
/// refuses to dispatch a workspace query without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// The session's private, uploaded documents (default)
    #[default]
    Workspace,
    /// The shared corpus
    Global,
}

impl SourceMode {
    /// Whether queries in this mode need a bound workspace
    pub fn requires_workspace(&self) -> bool {
        matches!(self, SourceMode::Workspace)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceMode::Workspace => "workspace",
            SourceMode::Global => "global",
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SourceMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workspace" | "ws" => Ok(SourceMode::Workspace),
            "global" => Ok(SourceMode::Global),
            _ => Err(DomainError::UnknownSourceMode(s.to_string())),
        }
    }
}

/// Logical identity of the LLM provider.
///
/// The concrete backend name (e.g. `ollama`, `groq`) is a wire detail mapped
/// by the application configuration; well-known names are accepted here as
/// aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Locally hosted model (default)
    #[default]
    Local,
    /// Cloud-hosted model
    Cloud,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Local => "local",
            ProviderKind::Cloud => "cloud",
        }
    }

    /// Guidance shown when the provider reports it is not ready
    pub fn not_ready_hint(&self) -> &'static str {
        match self {
            ProviderKind::Local => {
                "Make sure the local model server is running and the model is downloaded."
            }
            ProviderKind::Cloud => "Check the cloud API key configured on the server.",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "ollama" | "lmstudio" => Ok(ProviderKind::Local),
            "cloud" | "groq" => Ok(ProviderKind::Cloud),
            _ => Err(DomainError::UnknownProvider(s.to_string())),
        }
    }
}

/// Provider health signal, independent of which provider is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    NotReady,
    /// Not probed yet
    #[default]
    Unknown,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Readiness::Ready => "ready",
            Readiness::NotReady => "not ready",
            Readiness::Unknown => "unknown",
        }
    }
}

impl From<bool> for Readiness {
    fn from(ready: bool) -> Self {
        if ready {
            Readiness::Ready
        } else {
            Readiness::NotReady
        }
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
