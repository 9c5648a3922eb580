//! Configuration file loading for ragdesk
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `RAGDESK_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./ragdesk.toml` or `./.ragdesk.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/ragdesk/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_BASE_URL, FileApiConfig, FileChatConfig, FileConfig,
    FileLoggingConfig, FileProvidersConfig, FileReplConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
