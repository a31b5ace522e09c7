//! Generic metric row fetched from a target table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One row of a monitored table, reduced to its natural key, pod scope,
/// and a JSON map of metric fields.
///
/// The metrics repository builds these from each target table's closed
/// column list, so the evaluator never sees arbitrary columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRow {
    /// Natural key of the row (ad account id, brand, channel ref).
    pub entity_key: String,
    /// Pod the row belongs to, when the table is pod-scoped.
    pub pod_id: Option<Uuid>,
    /// When the row was captured upstream.
    pub captured_at: DateTime<Utc>,
    /// Metric fields by column name.
    pub fields: serde_json::Map<String, Value>,
}

impl MetricRow {
    /// Read a field as `f64`, coercing JSON numbers and numeric strings.
    ///
    /// Returns `None` for missing fields, nulls, non-numeric strings, and
    /// anything else; a row with partial data must evaluate as a
    /// non-match, never as an error.
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(fields: serde_json::Value) -> MetricRow {
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

    #[test]
    fn test_numeric_field_coerces_strings() {
        let r = row(json!({"spend": "123.45", "clicks": 7}));
        assert_eq!(r.numeric_field("spend"), Some(123.45));
        assert_eq!(r.numeric_field("clicks"), Some(7.0));
    }

    #[test]
    fn test_numeric_field_rejects_junk() {
        let r = row(json!({"spend": "n/a", "flag": true, "nested": {"x": 1}, "empty": null}));
        assert_eq!(r.numeric_field("spend"), None);
        assert_eq!(r.numeric_field("flag"), None);
        assert_eq!(r.numeric_field("nested"), None);
        assert_eq!(r.numeric_field("empty"), None);
        assert_eq!(r.numeric_field("missing"), None);
    }
}
