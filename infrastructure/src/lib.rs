//! Infrastructure layer for ragdesk
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP backend gateway, the file-backed local
//! store, the JSONL conversation log and configuration file loading.

pub mod config;
pub mod http;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileApiConfig, FileChatConfig, FileConfig,
    FileLoggingConfig, FileProvidersConfig, FileReplConfig, FileStorageConfig,
};
pub use http::{ApiError, HttpApiGateway, HttpSettings};
pub use logging::JsonlConversationLogger;
pub use storage::FileLocalStore;
