//! Local persistence port
//!
//! A string key-value store standing in for browser local storage. Reads
//! and writes are best-effort: callers fall back to defaults on error and
//! never surface store failures to the user.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Key holding the client session identifier
pub const SESSION_ID_KEY: &str = "session_id";

/// Key holding the remembered LLM provider
pub const PROVIDER_KEY: &str = "llm_provider";

/// Namespace of the per-user conversation history
pub const HISTORY_NAMESPACE: &str = "ob-chat:history";

/// Storage key of the conversation history for a user (`anon` when signed out)
pub fn history_key(user_id: Option<&str>) -> String {
    let user = user_id.filter(|u| !u.is_empty()).unwrap_or("anon");
    format!("{}:{}", HISTORY_NAMESPACE, user)
}

/// Errors raised by a local store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage is corrupted: {0}")]
    Corrupted(String),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Synchronous key-value persistence.
///
/// Local persistence is never a suspension point, so the trait is not async.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and `--ephemeral` runs.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl LocalStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
