//! Notification channel configuration (Discord relay, Twilio WhatsApp).

use serde::{Deserialize, Serialize};

/// Notification channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Discord bot relay settings.
    #[serde(default)]
    pub discord: DiscordConfig,
    /// Twilio WhatsApp settings.
    #[serde(default)]
    pub twilio: TwilioConfig,
    /// Timeout applied to every outbound notification request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            twilio: TwilioConfig::default(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Discord bot HTTP relay settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscordConfig {
    /// Whether Discord dispatch is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the bot relay, e.g. `https://bot.example.com`.
    #[serde(default)]
    pub relay_url: String,
    /// API key sent in the `x-api-key` header.
    #[serde(default)]
    pub api_key: String,
}

/// Twilio WhatsApp settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TwilioConfig {
    /// Whether WhatsApp dispatch is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Twilio account SID.
    #[serde(default)]
    pub account_sid: String,
    /// Twilio auth token.
    #[serde(default)]
    pub auth_token: String,
    /// Sender number in `whatsapp:+...` form.
    #[serde(default)]
    pub from_number: String,
}

fn default_request_timeout() -> u64 {
    15
}
