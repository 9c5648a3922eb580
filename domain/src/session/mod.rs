//! Client session domain.
//!
//! - [`entities::ClientSession`] — session identity, workspace binding and provider state
//! - [`value_objects::SourceMode`] — workspace-scoped vs global queries
//! - [`value_objects::ProviderKind`] / [`value_objects::Readiness`] — LLM provider selection

pub mod entities;
pub mod value_objects;
