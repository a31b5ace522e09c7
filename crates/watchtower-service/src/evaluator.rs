//! The condition evaluator.
//!
//! Pure rule-matching over a fetched metric row. The batch job calls
//! this once per row per rule; a row with missing or malformed data is
//! a non-match, never an error, so one bad row cannot poison a batch.

use watchtower_entity::metrics::MetricRow;
use watchtower_entity::rule::{Condition, ConditionOp};

/// A successful condition match for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionMatch {
    /// The metric value that satisfied the condition. For percentage
    /// change operators this is the computed change, not the raw value.
    pub value: f64,
    /// Human-readable description of the match, used as the alert
    /// message.
    pub message: String,
}

/// Evaluate a condition against one metric row.
///
/// Returns `Some(ConditionMatch)` when the condition holds, `None` when
/// it does not or when the row lacks the data to decide (missing field,
/// non-numeric value, absent percentage-change baseline).
pub fn evaluate(row: &MetricRow, condition: &Condition) -> Option<ConditionMatch> {
    let value = row.numeric_field(&condition.field)?;

    if condition.op.is_pct_change() {
        let baseline = row.numeric_field(&condition.baseline_field())?;
        if baseline == 0.0 {
            return None;
        }
        let change = (value - baseline) / baseline.abs() * 100.0;
        let matches = match condition.op {
            ConditionOp::PctChangeGt => change > condition.threshold,
            ConditionOp::PctChangeLt => change < condition.threshold,
            _ => unreachable!("is_pct_change covers exactly these variants"),
        };
        return matches.then(|| ConditionMatch {
            value: change,
            message: format!(
                "{} changed {:.2}% (threshold {} {}%)",
                condition.field,
                change,
                condition.op.symbol(),
                condition.threshold
            ),
        });
    }

    let matches = match condition.op {
        ConditionOp::Gt => value > condition.threshold,
        ConditionOp::Gte => value >= condition.threshold,
        ConditionOp::Lt => value < condition.threshold,
        ConditionOp::Lte => value <= condition.threshold,
        ConditionOp::Eq => value == condition.threshold,
        ConditionOp::Ne => value != condition.threshold,
        ConditionOp::PctChangeGt | ConditionOp::PctChangeLt => {
            unreachable!("handled above")
        }
    };

    matches.then(|| ConditionMatch {
        value,
        message: format!(
            "{} is {} (threshold {} {})",
            condition.field,
            value,
            condition.op.symbol(),
            condition.threshold
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{json, Value};

    fn row(fields: Value) -> MetricRow {
        let Value::Object(map) = fields else {
            panic!("expected object")
        };
        MetricRow {
            entity_key: "act_123".to_string(),
            pod_id: None,
            captured_at: Utc::now(),
            fields: map,
        }
    }

    fn cond(field: &str, op: ConditionOp, threshold: f64) -> Condition {
        Condition::new(field, op, threshold)
    }

    #[test]
    fn test_gt_matches_and_rejects() {
        let c = cond("spend", ConditionOp::Gt, 40.0);
        assert!(evaluate(&row(json!({"spend": 45})), &c).is_some());
        assert!(evaluate(&row(json!({"spend": 38})), &c).is_none());
        assert!(evaluate(&row(json!({"spend": 40})), &c).is_none());
    }

    #[test]
    fn test_gte_and_lte_include_the_boundary() {
        let gte = cond("spend", ConditionOp::Gte, 40.0);
        let lte = cond("spend", ConditionOp::Lte, 40.0);
        let boundary = row(json!({"spend": 40}));
        assert!(evaluate(&boundary, &gte).is_some());
        assert!(evaluate(&boundary, &lte).is_some());
    }

    #[test]
    fn test_lt_eq_ne() {
        let boundary = row(json!({"cvr_pct": 2.5}));
        assert!(evaluate(&boundary, &cond("cvr_pct", ConditionOp::Lt, 3.0)).is_some());
        assert!(evaluate(&boundary, &cond("cvr_pct", ConditionOp::Lt, 2.5)).is_none());
        assert!(evaluate(&boundary, &cond("cvr_pct", ConditionOp::Eq, 2.5)).is_some());
        assert!(evaluate(&boundary, &cond("cvr_pct", ConditionOp::Ne, 2.5)).is_none());
        assert!(evaluate(&boundary, &cond("cvr_pct", ConditionOp::Ne, 3.0)).is_some());
    }

    #[test]
    fn test_missing_or_non_numeric_fields_never_match() {
        let c = cond("spend", ConditionOp::Gt, 0.0);
        assert!(evaluate(&row(json!({})), &c).is_none());
        assert!(evaluate(&row(json!({"spend": null})), &c).is_none());
        assert!(evaluate(&row(json!({"spend": "n/a"})), &c).is_none());
        assert!(evaluate(&row(json!({"spend": true})), &c).is_none());
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let c = cond("spend", ConditionOp::Gt, 40.0);
        assert!(evaluate(&row(json!({"spend": "45.5"})), &c).is_some());
    }

    #[test]
    fn test_message_contains_value_and_threshold() {
        let c = cond("roas_timeframe", ConditionOp::Lt, 1.5);
        let m = evaluate(&row(json!({"roas_timeframe": 1.2})), &c)
            .expect("1.2 < 1.5 should match");
        assert_eq!(m.value, 1.2);
        assert!(m.message.contains("1.2"));
        assert!(m.message.contains("1.5"));
        assert!(m.message.contains("roas_timeframe"));
        assert!(m.message.contains("<"));
    }

    #[test]
    fn test_pct_change_gt() {
        // 150 from 100 is a +50% change.
        let r = row(json!({"spend": 150.0, "previous_spend": 100.0}));
        let c = cond("spend", ConditionOp::PctChangeGt, 30.0);
        let m = evaluate(&r, &c).expect("+50% should exceed +30%");
        assert_eq!(m.value, 50.0);
        assert!(m.message.contains("50.00%"));

        let tight = cond("spend", ConditionOp::PctChangeGt, 60.0);
        assert!(evaluate(&r, &tight).is_none());
    }

    #[test]
    fn test_pct_change_lt_detects_drops() {
        // 60 from 100 is a -40% change.
        let r = row(json!({"cvr_pct": 60.0, "previous_cvr_pct": 100.0}));
        let c = cond("cvr_pct", ConditionOp::PctChangeLt, -20.0);
        let m = evaluate(&r, &c).expect("-40% should be below -20%");
        assert_eq!(m.value, -40.0);
    }

    #[test]
    fn test_pct_change_without_baseline_never_matches() {
        let c = cond("spend", ConditionOp::PctChangeGt, 10.0);
        assert!(evaluate(&row(json!({"spend": 150.0})), &c).is_none());
        assert!(
            evaluate(&row(json!({"spend": 150.0, "previous_spend": 0.0})), &c).is_none()
        );
        assert!(
            evaluate(&row(json!({"spend": 150.0, "previous_spend": "?"})), &c).is_none()
        );
    }
}
