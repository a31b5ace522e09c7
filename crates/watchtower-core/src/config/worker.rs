//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// In-process evaluation scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the in-process cron scheduler is enabled. When disabled,
    /// evaluation only runs via the HTTP cron endpoint.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}
