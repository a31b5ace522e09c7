//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query parameters for the cron trigger endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronParams {
    /// Which evaluation window to run: `daily` or `weekly`.
    pub schedule: String,
    /// Shared secret. Compared against `watchtower.cron_secret`.
    #[serde(default)]
    pub key: String,
}

/// Filter parameters for listing rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleFilterParams {
    /// Filter by severity.
    pub severity: Option<String>,
    /// Filter by active flag.
    pub is_active: Option<bool>,
    /// Filter by target table.
    pub target_table: Option<String>,
}

/// Filter parameters for listing alerts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertFilterParams {
    /// Filter by severity.
    pub severity: Option<String>,
    /// Filter by acknowledged state.
    pub acknowledged: Option<bool>,
    /// Filter by target table.
    pub target_table: Option<String>,
    /// Filter by originating rule.
    pub rule_id: Option<Uuid>,
}

/// Body for acknowledging a single alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgeRequest {
    /// Who is acknowledging.
    pub acknowledged_by: String,
}

/// Body for bulk acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgeBulkRequest {
    /// Alerts to acknowledge.
    pub alert_ids: Vec<Uuid>,
    /// Who is acknowledging.
    pub acknowledged_by: String,
}

/// Query parameters for the channel-ids lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelIdsParams {
    /// The rule whose destinations to resolve.
    pub rule_id: Uuid,
}
