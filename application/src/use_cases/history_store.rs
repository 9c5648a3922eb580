//! Local conversation history.
//!
//! Snapshots are kept as a JSON array under a per-user key of the
//! [`LocalStore`]. The collection is a convenience cache: any read or write
//! failure degrades to an empty history and is only logged.

use crate::ports::local_store::{LocalStore, history_key};
use ragdesk_domain::ConversationSnapshot;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-user snapshot persistence on top of a [`LocalStore`].
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn LocalStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Load the history of a user; corrupt or missing entries yield an empty list.
    pub fn load(&self, user_id: Option<&str>) -> Vec<ConversationSnapshot> {
        let key = history_key(user_id);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Could not read history {}: {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ConversationSnapshot>>(&raw) {
            Ok(snapshots) => {
                debug!("Loaded {} history entries from {}", snapshots.len(), key);
                snapshots
            }
            Err(e) => {
                warn!("Discarding unreadable history {}: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Persist the full history of a user.
    pub fn save(&self, user_id: Option<&str>, snapshots: &[ConversationSnapshot]) {
        let key = history_key(user_id);
        let raw = match serde_json::to_string(snapshots) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not serialize history {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.set(&key, &raw) {
            warn!("Could not write history {}: {}", key, e);
        }
    }

    /// Remove the history of a user.
    pub fn clear(&self, user_id: Option<&str>) {
        let key = history_key(user_id);
        if let Err(e) = self.store.remove(&key) {
            warn!("Could not clear history {}: {}", key, e);
        }
    }
}
