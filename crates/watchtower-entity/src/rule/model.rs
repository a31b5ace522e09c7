//! Rule entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::condition::{Condition, ConditionOp};
use super::schedule::Schedule;
use super::severity::Severity;
use super::target::TargetTable;

/// A persisted alerting rule.
///
/// The condition is stored as flat columns (`condition_field`,
/// `condition_op`, `threshold`); [`Rule::condition`] reassembles it for
/// the evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rule {
    /// Unique rule identifier.
    pub id: Uuid,
    /// Human-readable rule name.
    pub name: String,
    /// The metric table this rule watches.
    pub target_table: TargetTable,
    /// The metric column the condition reads.
    pub condition_field: String,
    /// The comparison operator.
    pub condition_op: ConditionOp,
    /// The threshold to compare against.
    pub threshold: f64,
    /// Severity inherited by alerts this rule produces.
    pub severity: Severity,
    /// Which evaluation window picks this rule up.
    pub schedule: Schedule,
    /// Whether the evaluation job considers this rule.
    pub is_active: bool,
    /// Optional pod scope. Unscoped rules see every pod's rows.
    pub pod_id: Option<Uuid>,
    /// Parent rule for compound/grouped rules. Deleting the parent
    /// cascades to the whole group.
    pub parent_rule_id: Option<Uuid>,
    /// When the rule last produced at least one alert.
    pub last_triggered_at: Option<DateTime<Utc>>,
    /// How many alerts the rule has produced in total.
    pub trigger_count: i64,
    /// When the rule was created.
    pub created_at: DateTime<Utc>,
    /// When the rule was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// Reassemble the stored condition columns.
    pub fn condition(&self) -> Condition {
        Condition {
            field: self.condition_field.clone(),
            op: self.condition_op,
            threshold: self.threshold,
        }
    }

    /// Whether this rule participates in a run of the given window.
    pub fn runs_in(&self, window: Schedule) -> bool {
        self.is_active && self.schedule.runs_in(window)
    }
}

/// Parameters for creating a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRule {
    /// Human-readable rule name.
    pub name: String,
    /// The metric table this rule watches.
    pub target_table: TargetTable,
    /// The condition to evaluate.
    pub condition: Condition,
    /// Severity for produced alerts.
    pub severity: Severity,
    /// Evaluation window.
    pub schedule: Schedule,
    /// Optional pod scope.
    pub pod_id: Option<Uuid>,
    /// Optional parent rule for compound groups.
    pub parent_rule_id: Option<Uuid>,
    /// Whether the rule starts active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Partial update of a rule. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRule {
    /// New name.
    pub name: Option<String>,
    /// New condition.
    pub condition: Option<Condition>,
    /// New severity.
    pub severity: Option<Severity>,
    /// New schedule.
    pub schedule: Option<Schedule>,
    /// New pod scope (`Some(None)` clears it).
    #[serde(default, with = "double_option")]
    pub pod_id: Option<Option<Uuid>>,
}

fn default_active() -> bool {
    true
}

/// Serde helper distinguishing "absent" from "explicitly null".
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rule() -> Rule {
        Rule {
            id: Uuid::new_v4(),
            name: "ROAS floor".to_string(),
            target_table: TargetTable::RefreshSnapshotMetrics,
            condition_field: "roas_timeframe".to_string(),
            condition_op: ConditionOp::Lt,
            threshold: 1.5,
            severity: Severity::High,
            schedule: Schedule::Daily,
            is_active: true,
            pod_id: None,
            parent_rule_id: None,
            last_triggered_at: None,
            trigger_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_condition_reassembly() {
        let rule = sample_rule();
        let cond = rule.condition();
        assert_eq!(cond.field, "roas_timeframe");
        assert_eq!(cond.op, ConditionOp::Lt);
        assert_eq!(cond.threshold, 1.5);
    }

    #[test]
    fn test_inactive_rule_never_runs() {
        let mut rule = sample_rule();
        rule.is_active = false;
        assert!(!rule.runs_in(Schedule::Daily));
    }
}
