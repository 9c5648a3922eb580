//! Application layer for ragdesk
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatConfig, ProviderNames};
pub use ports::{
    admin_gateway::{AdminGateway, AuthGateway},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    local_store::{InMemoryStore, LocalStore, StoreError},
    rag_gateway::{GatewayError, RagGateway},
    ui_event::UiEvent,
};
pub use use_cases::account::{Account, AccountError};
pub use use_cases::admin_console::{AdminActionOutcome, AdminConsole};
pub use use_cases::history_browser::{
    DEFAULT_MESSAGE_LIMIT, DEFAULT_SESSION_LIMIT, HistoryBrowser,
};
pub use use_cases::history_store::HistoryStore;
pub use use_cases::session_controller::SessionController;
