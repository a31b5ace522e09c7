//! Twilio WhatsApp channel.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use watchtower_core::config::notify::{NotifyConfig, TwilioConfig};
use watchtower_core::error::{AppError, ErrorKind};
use watchtower_core::result::AppResult;
use watchtower_entity::alert::Alert;
use watchtower_entity::pod::ChannelKind;

use crate::channel::NotificationChannel;
use crate::format::alert_text;

/// Sends alerts as WhatsApp messages via the Twilio REST API.
#[derive(Debug)]
pub struct WhatsAppChannel {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl WhatsAppChannel {
    /// Build the channel from configuration. Returns `None` when
    /// WhatsApp dispatch is disabled or credentials are missing.
    pub fn from_config(config: &NotifyConfig) -> AppResult<Option<Self>> {
        let TwilioConfig {
            enabled,
            account_sid,
            auth_token,
            from_number,
        } = &config.twilio;

        if !enabled || account_sid.is_empty() || auth_token.is_empty() {
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
            account_sid: account_sid.clone(),
            auth_token: auth_token.clone(),
            from_number: from_number.clone(),
        }))
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

#[async_trait]
impl NotificationChannel for WhatsAppChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Whatsapp
    }

    async fn send(&self, alert: &Alert, address: &str) -> AppResult<()> {
        // Twilio expects the whatsapp: prefix on both numbers.
        let to = if address.starts_with("whatsapp:") {
            address.to_string()
        } else {
            format!("whatsapp:{address}")
        };

        let body = alert_text(alert);
        let params = [
            ("To", to.as_str()),
            ("From", self.from_number.as_str()),
            ("Body", body.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Twilio unreachable", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Twilio returned {status}: {detail}"
            )));
        }

        debug!(alert_id = %alert.id, to = %to, "WhatsApp notification sent");
        Ok(())
    }
}
