//! Provider name mapping between the logical [`ProviderKind`] and the
//! concrete names the backend understands.

use ragdesk_domain::ProviderKind;
use serde::{Deserialize, Serialize};

/// Backend names for each logical provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderNames {
    pub local: String,
    pub cloud: String,
}

impl Default for ProviderNames {
    fn default() -> Self {
        Self {
            local: "ollama".to_string(),
            cloud: "groq".to_string(),
        }
    }
}

impl ProviderNames {
    /// Name sent to the backend for a provider
    pub fn to_wire(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::Local => &self.local,
            ProviderKind::Cloud => &self.cloud,
        }
    }

    /// Resolve a backend name, trying the configured names before the
    /// built-in aliases.
    pub fn from_wire(&self, name: &str) -> Option<ProviderKind> {
        let name = name.trim();
        if name.eq_ignore_ascii_case(&self.local) {
            Some(ProviderKind::Local)
        } else if name.eq_ignore_ascii_case(&self.cloud) {
            Some(ProviderKind::Cloud)
        } else {
            name.parse().ok()
        }
    }

    /// Human label, e.g. `local (ollama)`
    pub fn label(&self, kind: ProviderKind) -> String {
        format!("{} ({})", kind, self.to_wire(kind))
    }
}
