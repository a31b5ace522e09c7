//! Rule evaluation and cron endpoint configuration.

use serde::{Deserialize, Serialize};

/// Evaluation job and cron endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchtowerConfig {
    /// Shared secret required by the cron trigger endpoint. Mandatory:
    /// there is no default and an empty value fails config validation.
    pub cron_secret: String,
    /// Delay between consecutive notification sends, in milliseconds.
    /// The downstream relays tolerate roughly 10 messages per second.
    #[serde(default = "default_dispatch_delay_ms")]
    pub dispatch_delay_ms: u64,
    /// Cron expression for the daily evaluation run.
    #[serde(default = "default_daily_cron")]
    pub daily_cron: String,
    /// Cron expression for the weekly evaluation run.
    #[serde(default = "default_weekly_cron")]
    pub weekly_cron: String,
}

fn default_dispatch_delay_ms() -> u64 {
    100
}

/// Every day at 07:00 UTC.
fn default_daily_cron() -> String {
    "0 0 7 * * *".to_string()
}

/// Every Monday at 07:30 UTC.
fn default_weekly_cron() -> String {
    "0 30 7 * * 1".to_string()
}
