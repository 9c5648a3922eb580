//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod admin_gateway;
pub mod conversation_logger;
pub mod local_store;
pub mod rag_gateway;
pub mod ui_event;
