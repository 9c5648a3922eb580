//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! after validation.

mod api;
mod chat;
mod logging;
mod providers;
mod repl;
mod storage;

pub use api::{DEFAULT_BASE_URL, FileApiConfig};
pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use providers::FileProvidersConfig;
pub use repl::FileReplConfig;
pub use storage::FileStorageConfig;

use ragdesk_application::ChatConfig;
use ragdesk_domain::{ProviderKind, SourceMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("api.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("api.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("chat.top_k must be at least 1")]
    InvalidTopK,

    #[error("chat.min_score cannot be negative (got {0})")]
    NegativeMinScore(f64),

    #[error("chat.title_max_chars must be at least 1")]
    InvalidTitleLength,

    #[error("provider name cannot be empty")]
    EmptyProviderName,

    #[error("unknown provider '{0}' (expected local or cloud)")]
    UnknownProvider(String),

    #[error("unknown source '{0}' (expected workspace or global)")]
    UnknownSource(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend connection settings
    pub api: FileApiConfig,
    /// Session controller behaviour
    pub chat: FileChatConfig,
    /// Backend provider names
    pub providers: FileProvidersConfig,
    /// Local state file
    pub storage: FileStorageConfig,
    /// Diagnostic and conversation logs
    pub logging: FileLoggingConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if self.chat.top_k == 0 {
            return Err(ConfigValidationError::InvalidTopK);
        }
        if self.chat.min_score < 0.0 {
            return Err(ConfigValidationError::NegativeMinScore(self.chat.min_score));
        }
        if self.chat.title_max_chars == 0 {
            return Err(ConfigValidationError::InvalidTitleLength);
        }
        if self.providers.local.trim().is_empty() || self.providers.cloud.trim().is_empty() {
            return Err(ConfigValidationError::EmptyProviderName);
        }

        self.fallback_provider()?;
        self.default_source()?;
        Ok(())
    }

    fn fallback_provider(&self) -> Result<ProviderKind, ConfigValidationError> {
        self.chat
            .fallback_provider
            .parse()
            .map_err(|_| ConfigValidationError::UnknownProvider(self.chat.fallback_provider.clone()))
    }

    fn default_source(&self) -> Result<SourceMode, ConfigValidationError> {
        self.chat
            .default_source
            .parse()
            .map_err(|_| ConfigValidationError::UnknownSource(self.chat.default_source.clone()))
    }

    /// Validate and convert into the session controller configuration
    pub fn to_chat_config(&self) -> Result<ChatConfig, ConfigValidationError> {
        self.validate()?;

        let mut config = ChatConfig::default()
            .with_query(self.chat.query_options())
            .with_fallback_provider(self.fallback_provider()?)
            .with_providers(self.providers.to_provider_names())
            .with_default_source(self.default_source()?)
            .with_title_max_chars(self.chat.title_max_chars)
            .with_wipe_messages_on_end(self.chat.wipe_messages_on_end);
        config.auto_build_on_upload = self.chat.auto_build_on_upload;
        Ok(config)
    }
}
