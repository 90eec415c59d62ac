/// Webhook configuration kept in chrome.storage.sync

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize};

pub const WEBHOOK_URL_KEY: &str = "webhookUrl";
pub const API_KEY_KEY: &str = "apiKey";

/// 24 random bytes encode to exactly 32 base64 characters
pub const API_KEY_BYTES: usize = 24;

/// How long the options page shows its "saved" acknowledgement
pub const SAVE_ACK_MS: u32 = 750;

/// User settings. Missing storage fields default to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookConfig {
    #[serde(deserialize_with = "string_or_empty")]
    pub webhook_url: String,
    #[serde(deserialize_with = "string_or_empty")]
    pub api_key: String,
}

// A stored null reads as "" instead of failing the whole load
fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl WebhookConfig {
    pub fn new(webhook_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        WebhookConfig {
            webhook_url: webhook_url.into(),
            api_key: api_key.into(),
        }
    }

    /// A send is only possible once a webhook URL is set
    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}

/// Encode raw key material as URL-safe base64 without padding
pub fn encode_api_key(bytes: &[u8; API_KEY_BYTES]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a fresh API key from the platform CSPRNG
pub fn generate_api_key() -> Result<String> {
    let mut bytes = [0u8; API_KEY_BYTES];
    getrandom::getrandom(&mut bytes).map_err(|e| Error::Random(e.to_string()))?;
    Ok(encode_api_key(&bytes))
}
