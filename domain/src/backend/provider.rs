//! Provider status and selection results

use serde::{Deserialize, Deserializer, Serialize};

/// Current provider as reported by the status probe.
///
/// `active_provider` is the backend's concrete name and is `None` when no
/// provider has been selected server-side yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderStatus {
    pub active_provider: Option<String>,
    #[serde(deserialize_with = "null_as_false")]
    pub ready: bool,
}

/// Outcome of a provider selection call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSelection {
    pub provider: String,
    #[serde(deserialize_with = "null_as_false")]
    pub ready: bool,
}

/// Readiness reported as `null` means not ready
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
