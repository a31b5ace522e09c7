//! Fan-out of alerts to the configured notification channels.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use watchtower_core::config::notify::NotifyConfig;
use watchtower_core::result::AppResult;
use watchtower_entity::alert::Alert;
use watchtower_entity::pod::ChannelDestination;

use crate::channel::NotificationChannel;
use crate::channels::{DiscordChannel, WhatsAppChannel};

/// Routes alerts to every matching destination.
///
/// Channels are built once from configuration at startup. Destinations
/// whose kind has no enabled channel are skipped. A failing send is
/// logged and never aborts the remaining destinations.
#[derive(Debug)]
pub struct AlertDispatcher {
    channels: Vec<Box<dyn NotificationChannel>>,
    dispatch_delay: Duration,
    last_send: Mutex<Option<Instant>>,
}

impl AlertDispatcher {
    /// Build the dispatcher from configuration, instantiating only the
    /// channels that are enabled and fully configured.
    pub fn from_config(config: &NotifyConfig, dispatch_delay_ms: u64) -> AppResult<Self> {
        let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();

        if let Some(discord) = DiscordChannel::from_config(config)? {
            channels.push(Box::new(discord));
        }
        if let Some(whatsapp) = WhatsAppChannel::from_config(config)? {
            channels.push(Box::new(whatsapp));
        }

        if channels.is_empty() {
            warn!("No notification channels configured, alerts will not be delivered");
        }

        Ok(Self {
            channels,
            dispatch_delay: Duration::from_millis(dispatch_delay_ms),
            last_send: Mutex::new(None),
        })
    }

    /// Whether at least one channel is available.
    pub fn has_channels(&self) -> bool {
        !self.channels.is_empty()
    }

    /// Deliver one alert to the given destinations.
    ///
    /// Returns the number of successful sends. Sends are sequential and
    /// paced so the relay and Twilio are not hammered during alert
    /// bursts; the pacing spans calls, so consecutive alerts in one
    /// evaluation run do not send back-to-back either.
    pub async fn dispatch(&self, alert: &Alert, destinations: &[ChannelDestination]) -> usize {
        let mut sent = 0usize;

        for destination in destinations {
            let Some(channel) = self
                .channels
                .iter()
                .find(|c| c.kind() == destination.channel)
            else {
                continue;
            };

            self.pace().await;

            match channel.send(alert, &destination.address).await {
                Ok(()) => {
                    sent += 1;
                    info!(
                        alert_id = %alert.id,
                        channel = %destination.channel,
                        "Notification delivered"
                    );
                }
                Err(err) => {
                    warn!(
                        alert_id = %alert.id,
                        channel = %destination.channel,
                        address = %destination.address,
                        error = %err,
                        "Notification delivery failed"
                    );
                }
            }
        }

        sent
    }

    /// Wait until the configured delay has passed since the previous
    /// send. The last send time is shared dispatcher state, not local
    /// to one `dispatch` call.
    async fn pace(&self) {
        if self.dispatch_delay.is_zero() {
            return;
        }

        let mut last_send = self.last_send.lock().await;
        if let Some(last) = *last_send {
            let since = last.elapsed();
            if since < self.dispatch_delay {
                tokio::time::sleep(self.dispatch_delay - since).await;
            }
        }
        *last_send = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use watchtower_entity::pod::ChannelKind;

    use super::*;

    #[test]
    fn test_from_config_with_everything_disabled_has_no_channels() {
        let dispatcher = AlertDispatcher::from_config(&NotifyConfig::default(), 100)
            .expect("dispatcher should build from an empty config");
        assert!(!dispatcher.has_channels());
    }

    #[tokio::test]
    async fn test_dispatch_without_channels_sends_nothing() {
        let dispatcher = AlertDispatcher::from_config(&NotifyConfig::default(), 0)
            .expect("dispatcher should build from an empty config");
        let alert = sample_alert();
        assert_eq!(
            dispatcher.dispatch(&alert, &[discord_destination()]).await,
            0
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_spans_consecutive_dispatch_calls() {
        let sent_at = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = AlertDispatcher {
            channels: vec![Box::new(RecordingChannel {
                sent_at: Arc::clone(&sent_at),
            })],
            dispatch_delay: Duration::from_millis(100),
            last_send: Mutex::new(None),
        };
        let destinations = vec![discord_destination()];

        // Two alerts dispatched one after the other, one destination
        // each: the second send must still respect the delay.
        assert_eq!(dispatcher.dispatch(&sample_alert(), &destinations).await, 1);
        assert_eq!(dispatcher.dispatch(&sample_alert(), &destinations).await, 1);

        let sent_at = sent_at.lock().await;
        assert_eq!(sent_at.len(), 2);
        assert!(sent_at[1] - sent_at[0] >= Duration::from_millis(100));
    }

    #[derive(Debug)]
    struct RecordingChannel {
        sent_at: Arc<Mutex<Vec<Instant>>>,
    }

    #[async_trait::async_trait]
    impl NotificationChannel for RecordingChannel {
        fn kind(&self) -> ChannelKind {
            ChannelKind::Discord
        }

        async fn send(&self, _alert: &Alert, _address: &str) -> AppResult<()> {
            self.sent_at.lock().await.push(Instant::now());
            Ok(())
        }
    }

    fn discord_destination() -> ChannelDestination {
        ChannelDestination {
            id: uuid::Uuid::new_v4(),
            pod_id: uuid::Uuid::new_v4(),
            channel: ChannelKind::Discord,
            address: "123456".to_string(),
            is_active: true,
        }
    }

    fn sample_alert() -> Alert {
        use watchtower_entity::rule::{Severity, TargetTable};
        Alert {
            id: uuid::Uuid::new_v4(),
            rule_id: uuid::Uuid::new_v4(),
            entity_key: "brand-a".to_string(),
            target_table: TargetTable::FinanceMetrics,
            severity: Severity::Critical,
            message: "spend is 900 (threshold > 500)".to_string(),
            metric_value: 900.0,
            threshold: 500.0,
            is_acknowledged: false,
            acknowledged_at: None,
            acknowledged_by: None,
            created_at: chrono::Utc::now(),
        }
    }
}
