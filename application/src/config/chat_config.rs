//! Session controller configuration.

use super::provider_names::ProviderNames;
use ragdesk_domain::{ProviderKind, QueryOptions, SourceMode};
use serde::{Deserialize, Serialize};

/// Behaviour of the [`SessionController`](crate::use_cases::session_controller::SessionController).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Retrieval parameters sent with every query
    pub query: QueryOptions,
    /// Provider used when nothing is remembered or the status probe fails
    pub fallback_provider: ProviderKind,
    /// Backend names for each provider
    pub providers: ProviderNames,
    /// Source mode at startup
    pub default_source: SourceMode,
    /// Maximum characters of a history entry title
    pub title_max_chars: usize,
    /// Ask the backend to rebuild the index after each upload
    pub auto_build_on_upload: bool,
    /// Ask the backend to wipe stored messages when ending a session
    pub wipe_messages_on_end: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            query: QueryOptions::default(),
            fallback_provider: ProviderKind::Local,
            providers: ProviderNames::default(),
            default_source: SourceMode::Workspace,
            title_max_chars: 40,
            auto_build_on_upload: true,
            wipe_messages_on_end: false,
        }
    }
}

impl ChatConfig {
    // ==================== Builder Methods ====================

    pub fn with_query(mut self, query: QueryOptions) -> Self {
        self.query = query;
        self
    }

    pub fn with_fallback_provider(mut self, provider: ProviderKind) -> Self {
        self.fallback_provider = provider;
        self
    }

    pub fn with_providers(mut self, providers: ProviderNames) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_default_source(mut self, source: SourceMode) -> Self {
        self.default_source = source;
        self
    }

    pub fn with_title_max_chars(mut self, max: usize) -> Self {
        self.title_max_chars = max;
        self
    }

    pub fn with_wipe_messages_on_end(mut self, wipe: bool) -> Self {
        self.wipe_messages_on_end = wipe;
        self
    }
}
