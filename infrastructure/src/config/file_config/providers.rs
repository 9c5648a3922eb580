//! Provider configuration from TOML (`[providers]` section)

use ragdesk_application::ProviderNames;
use serde::{Deserialize, Serialize};

/// Backend names of the local and cloud providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Name sent for the local provider (default: "ollama")
    pub local: String,
    /// Name sent for the cloud provider (default: "groq")
    pub cloud: String,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        let names = ProviderNames::default();
        Self {
            local: names.local,
            cloud: names.cloud,
        }
    }
}

impl FileProvidersConfig {
    pub fn to_provider_names(&self) -> ProviderNames {
        ProviderNames {
            local: self.local.trim().to_string(),
            cloud: self.cloud.trim().to_string(),
        }
    }
}
