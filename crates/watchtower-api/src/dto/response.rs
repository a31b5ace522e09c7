//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use watchtower_entity::rule::Schedule;

/// Standard success response wrapper, the `ok: true` arm of the
/// response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true`.
    pub ok: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count value.
    pub count: u64,
}

/// Result of one cron-triggered evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronRunResponse {
    /// The window that ran.
    pub schedule: Schedule,
    /// Rules evaluated without error.
    pub rules_processed: u64,
    /// Alerts created this run.
    pub alerts_created: u64,
    /// Notification sends that succeeded.
    pub notifications_sent: u64,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Database status.
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok(MessageResponse {
            message: "done".to_string(),
        }))
        .unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["data"]["message"], "done");
    }
}
