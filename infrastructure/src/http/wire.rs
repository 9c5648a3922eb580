//! Request and response bodies of the backend API
//!
//! Only the shapes that differ from domain read models live here; answers,
//! provider status and receipts deserialize straight into domain types.

use ragdesk_domain::{IndexStats, QueryOptions, UserProfile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct EnsureWorkspaceRequest<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct EnsureWorkspaceResponse {
    #[serde(alias = "workspace_id", alias = "id")]
    pub ws_id: String,
}

#[derive(Debug, Serialize)]
pub struct BuildRequest<'a> {
    pub ws_id: &'a str,
    pub force: bool,
}

/// Build result; stats arrive either nested under `build` or at the top level
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildResponse {
    pub build: Option<BuildSection>,
    pub stats: Option<IndexStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub stats: Option<IndexStats>,
}

impl BuildResponse {
    pub fn into_stats(self) -> IndexStats {
        self.build
            .and_then(|b| b.stats)
            .or(self.stats)
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub q: &'a str,
    pub k: usize,
    pub min_score: f64,
    pub include_context: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

impl<'a> AskRequest<'a> {
    pub fn new(q: &'a str, options: &QueryOptions, session_id: Option<&'a str>) -> Self {
        Self {
            q,
            k: options.top_k,
            min_score: options.min_score,
            include_context: options.include_context,
            session_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelectProviderRequest<'a> {
    pub provider: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CleanupRequest<'a> {
    pub session_id: &'a str,
    pub wipe_messages: bool,
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// A list returned bare or wrapped in an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "sessions", alias = "messages")]
        items: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { items } => items,
        }
    }
}

/// A user profile returned bare or wrapped as `{user: ...}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UserEnvelope {
    Wrapped { user: UserProfile },
    Bare(UserProfile),
}

impl From<UserEnvelope> for UserProfile {
    fn from(envelope: UserEnvelope) -> Self {
        match envelope {
            UserEnvelope::Wrapped { user } | UserEnvelope::Bare(user) => user,
        }
    }
}
