//! Alert entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::rule::severity::Severity;
use crate::rule::target::TargetTable;

/// A persisted record of a rule's condition having matched.
///
/// `rule_id` is a weak reference: alerts outlive rule edits and rule
/// deletion, so historical alerts may point at a rule that no longer
/// exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    /// Unique alert identifier.
    pub id: Uuid,
    /// The rule that produced this alert (weak reference).
    pub rule_id: Uuid,
    /// Natural key of the row that matched (ad account, brand, channel).
    /// Together with `rule_id` this forms the dedup key while the alert
    /// is unacknowledged.
    pub entity_key: String,
    /// The table the matching row came from.
    pub target_table: TargetTable,
    /// Severity inherited from the rule at creation time.
    pub severity: Severity,
    /// Human-readable description of the match.
    pub message: String,
    /// The metric value observed at evaluation time.
    pub metric_value: f64,
    /// The rule threshold at evaluation time.
    pub threshold: f64,
    /// Whether a staff user has acknowledged the alert.
    pub is_acknowledged: bool,
    /// When the alert was acknowledged.
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// Who acknowledged the alert.
    pub acknowledged_by: Option<String>,
    /// When the alert was created.
    pub created_at: DateTime<Utc>,
}

/// Draft of an alert produced by the evaluator, before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlert {
    /// The rule that matched.
    pub rule_id: Uuid,
    /// Natural key of the matching row.
    pub entity_key: String,
    /// The table the matching row came from.
    pub target_table: TargetTable,
    /// Severity inherited from the rule.
    pub severity: Severity,
    /// Human-readable description of the match.
    pub message: String,
    /// The metric value observed.
    pub metric_value: f64,
    /// The rule threshold.
    pub threshold: f64,
}
