//! Discord bot HTTP relay channel.
//!
//! The agency runs a small bot service that accepts
//! `POST /send-message` with an API key and forwards the content to a
//! Discord channel. Watchtower only talks to that relay, never to
//! Discord directly.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use watchtower_core::config::notify::{DiscordConfig, NotifyConfig};
use watchtower_core::error::{AppError, ErrorKind};
use watchtower_core::result::AppResult;
use watchtower_entity::alert::Alert;
use watchtower_entity::pod::ChannelKind;

use crate::channel::NotificationChannel;
use crate::format::alert_text;

/// Sends alerts through the Discord bot relay.
#[derive(Debug)]
pub struct DiscordChannel {
    client: reqwest::Client,
    relay_url: String,
    api_key: String,
}

impl DiscordChannel {
    /// Build the channel from configuration. Returns `None` when Discord
    /// dispatch is disabled or the relay is not configured.
    pub fn from_config(config: &NotifyConfig) -> AppResult<Option<Self>> {
        let DiscordConfig {
            enabled,
            relay_url,
            api_key,
        } = &config.discord;

        if !enabled || relay_url.is_empty() {
            return Ok(None);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Some(Self {
            client,
            relay_url: relay_url.trim_end_matches('/').to_string(),
            api_key: api_key.clone(),
        }))
    }
}

#[async_trait]
impl NotificationChannel for DiscordChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Discord
    }

    async fn send(&self, alert: &Alert, address: &str) -> AppResult<()> {
        let url = format!("{}/send-message", self.relay_url);
        let body = serde_json::json!({
            "channel_id": address,
            "content": alert_text(alert),
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Discord relay unreachable", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Discord relay returned {status}: {detail}"
            )));
        }

        debug!(alert_id = %alert.id, channel_id = %address, "Discord notification sent");
        Ok(())
    }
}
