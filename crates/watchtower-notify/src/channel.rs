//! The notification channel abstraction.

use async_trait::async_trait;

use watchtower_core::result::AppResult;
use watchtower_entity::alert::Alert;
use watchtower_entity::pod::ChannelKind;

/// A transport capable of delivering one alert to one address.
#[async_trait]
pub trait NotificationChannel: Send + Sync + std::fmt::Debug {
    /// Which destination kind this channel serves.
    fn kind(&self) -> ChannelKind;

    /// Deliver the alert to the given address (Discord channel id or
    /// `whatsapp:+...` number). Errors are returned for the dispatcher
    /// to log; they never abort a batch.
    async fn send(&self, alert: &Alert, address: &str) -> AppResult<()>;
}
