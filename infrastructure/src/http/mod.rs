//! HTTP adapter for the RAG backend
//!
//! [`HttpApiGateway`] implements the [`RagGateway`](ragdesk_application::RagGateway),
//! [`AdminGateway`](ragdesk_application::AdminGateway) and
//! [`AuthGateway`](ragdesk_application::AuthGateway) ports with `reqwest`.

pub mod error;
pub mod gateway;
mod wire;

pub use error::ApiError;
pub use gateway::{HttpApiGateway, HttpSettings};
