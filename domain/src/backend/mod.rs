//! Results and options exchanged with the RAG backend.
//!
//! These are wire-independent value objects; the HTTP adapter maps its
//! JSON payloads onto them.

pub mod admin;
pub mod answer;
pub mod provider;
pub mod workspace;
