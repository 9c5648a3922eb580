//! Application-level configuration.
//!
//! This module provides configuration types that control how the session
//! controller behaves:
//!
//! - [`ChatConfig`] — query defaults, fallback provider, history title bound
//! - [`ProviderNames`] — mapping between logical providers and backend names

pub mod chat_config;
pub mod provider_names;

pub use chat_config::ChatConfig;
pub use provider_names::ProviderNames;
