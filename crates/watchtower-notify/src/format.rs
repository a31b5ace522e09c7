//! Alert message formatting shared by all channels.

use watchtower_entity::alert::Alert;

/// Render the one-line notification text for an alert.
///
/// Example: `[HIGH] act_123 | roas_timeframe is 1.2 (threshold < 1.5)`.
pub fn alert_text(alert: &Alert) -> String {
    format!(
        "[{}] {} | {}",
        alert.severity.as_str().to_uppercase(),
        alert.entity_key,
        alert.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use watchtower_entity::rule::{Severity, TargetTable};

    #[test]
    fn test_alert_text_carries_severity_and_message() {
        let alert = Alert {
            id: Uuid::new_v4(),
            rule_id: Uuid::new_v4(),
            entity_key: "act_123".to_string(),
            target_table: TargetTable::RefreshSnapshotMetrics,
            severity: Severity::High,
            message: "roas_timeframe is 1.2 (threshold < 1.5)".to_string(),
            metric_value: 1.2,
            threshold: 1.5,
            is_acknowledged: false,
            acknowledged_at: None,
            acknowledged_by: None,
            created_at: Utc::now(),
        };
        let text = alert_text(&alert);
        assert!(text.starts_with("[HIGH]"));
        assert!(text.contains("act_123"));
        assert!(text.contains("1.2"));
        assert!(text.contains("1.5"));
    }
}
