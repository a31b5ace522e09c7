//! Aggregate statistics over rules and alerts.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use watchtower_core::result::AppResult;
use watchtower_database::repositories::alert::AlertRepository;
use watchtower_database::repositories::rule::RuleRepository;
use watchtower_entity::rule::Severity;

/// Snapshot of alerting activity for the dashboard.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WatchtowerStats {
    /// Total number of alerts ever created.
    pub total_alerts: i64,
    /// Alerts still waiting for acknowledgement.
    pub unacknowledged_alerts: i64,
    /// Alert counts per severity.
    pub alerts_by_severity: Vec<SeverityCount>,
    /// Number of active rules.
    pub active_rules: i64,
    /// When the most recent alert was created, if any.
    pub latest_alert_at: Option<DateTime<Utc>>,
}

/// One severity bucket in the stats response.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SeverityCount {
    /// The severity bucket.
    pub severity: Severity,
    /// Number of alerts in the bucket.
    pub count: i64,
}

/// Computes [`WatchtowerStats`].
#[derive(Debug, Clone)]
pub struct StatsService {
    alert_repo: Arc<AlertRepository>,
    rule_repo: Arc<RuleRepository>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(alert_repo: Arc<AlertRepository>, rule_repo: Arc<RuleRepository>) -> Self {
        Self {
            alert_repo,
            rule_repo,
        }
    }

    /// Gather the current stats snapshot.
    pub async fn snapshot(&self) -> AppResult<WatchtowerStats> {
        let total_alerts = self.alert_repo.count_total().await?;
        let unacknowledged_alerts = self.alert_repo.count_unacknowledged().await?;
        let alerts_by_severity = self
            .alert_repo
            .count_by_severity()
            .await?
            .into_iter()
            .map(|(severity, count)| SeverityCount { severity, count })
            .collect();
        let active_rules = self.rule_repo.count_active().await?;
        let latest_alert_at = self.alert_repo.latest_created_at().await?;

        Ok(WatchtowerStats {
            total_alerts,
            unacknowledged_alerts,
            alerts_by_severity,
            active_rules,
            latest_alert_at,
        })
    }
}
