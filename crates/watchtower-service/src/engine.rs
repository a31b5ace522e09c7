//! The scheduled evaluation job.
//!
//! One run covers one schedule window: fetch the participating rules,
//! evaluate each against the current rows of its target table, persist
//! new alerts, and fan the new alerts out to the owning pod's
//! notification destinations.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use watchtower_core::result::AppResult;
use watchtower_database::repositories::alert::AlertRepository;
use watchtower_database::repositories::metrics::MetricsRepository;
use watchtower_database::repositories::pod::PodRepository;
use watchtower_database::repositories::rule::RuleRepository;
use watchtower_entity::alert::NewAlert;
use watchtower_entity::pod::ChannelDestination;
use watchtower_entity::rule::{Rule, Schedule};
use watchtower_notify::AlertDispatcher;

use crate::evaluator::evaluate;

/// Aggregate result of one evaluation run.
///
/// Rules that failed mid-processing are excluded from every count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EvaluationSummary {
    /// Rules evaluated without error.
    pub rules_processed: u64,
    /// Alerts newly persisted this run.
    pub alerts_created: u64,
    /// Notification sends that succeeded.
    pub notifications_sent: u64,
}

/// Runs the rule evaluation batch for a schedule window.
#[derive(Debug, Clone)]
pub struct EvaluationJob {
    rule_repo: Arc<RuleRepository>,
    alert_repo: Arc<AlertRepository>,
    pod_repo: Arc<PodRepository>,
    metrics_repo: Arc<MetricsRepository>,
    dispatcher: Arc<AlertDispatcher>,
}

impl EvaluationJob {
    /// Creates a new evaluation job.
    pub fn new(
        rule_repo: Arc<RuleRepository>,
        alert_repo: Arc<AlertRepository>,
        pod_repo: Arc<PodRepository>,
        metrics_repo: Arc<MetricsRepository>,
        dispatcher: Arc<AlertDispatcher>,
    ) -> Self {
        Self {
            rule_repo,
            alert_repo,
            pod_repo,
            metrics_repo,
            dispatcher,
        }
    }

    /// Run one evaluation pass for the given schedule window.
    ///
    /// A failure while processing one rule is logged and skipped; the
    /// batch always continues with the remaining rules. Only fetching
    /// the rule list itself is fatal.
    pub async fn run(&self, window: Schedule) -> AppResult<EvaluationSummary> {
        let rules = self.rule_repo.find_for_window(window).await?;
        info!(window = %window, rule_count = rules.len(), "Evaluation run starting");

        let mut summary = EvaluationSummary::default();
        for rule in &rules {
            match self.process_rule(rule).await {
                Ok((created, sent)) => {
                    summary.rules_processed += 1;
                    summary.alerts_created += created;
                    summary.notifications_sent += sent;
                }
                Err(err) => {
                    error!(
                        rule_id = %rule.id,
                        rule_name = %rule.name,
                        error = %err,
                        "Rule evaluation failed, continuing with remaining rules"
                    );
                }
            }
        }

        info!(
            window = %window,
            rules_processed = summary.rules_processed,
            alerts_created = summary.alerts_created,
            notifications_sent = summary.notifications_sent,
            "Evaluation run finished"
        );
        Ok(summary)
    }

    /// Evaluate one rule over its target table. Returns the number of
    /// alerts created and notifications sent.
    async fn process_rule(&self, rule: &Rule) -> AppResult<(u64, u64)> {
        let rows = self
            .metrics_repo
            .fetch_rows(rule.target_table, rule.pod_id)
            .await?;
        let condition = rule.condition();

        let mut destinations: Option<Vec<ChannelDestination>> = None;
        let mut created = 0u64;
        let mut sent = 0u64;

        for row in &rows {
            let Some(m) = evaluate(row, &condition) else {
                continue;
            };

            // An open alert for this (rule, entity) pair suppresses
            // re-alerting until someone acknowledges it.
            if self
                .alert_repo
                .exists_unacknowledged(rule.id, &row.entity_key)
                .await?
            {
                continue;
            }

            let draft = NewAlert {
                rule_id: rule.id,
                entity_key: row.entity_key.clone(),
                target_table: rule.target_table,
                severity: rule.severity,
                message: m.message,
                metric_value: m.value,
                threshold: condition.threshold,
            };

            // None means a concurrent run won the insert race.
            let Some(alert) = self.alert_repo.create(&draft).await? else {
                warn!(
                    rule_id = %rule.id,
                    entity_key = %row.entity_key,
                    "Alert already created by a concurrent run, skipping"
                );
                continue;
            };
            created += 1;

            if destinations.is_none() {
                destinations = Some(self.destinations_for(rule).await?);
            }
            if let Some(dests) = &destinations {
                sent += self.dispatcher.dispatch(&alert, dests).await as u64;
            }
        }

        if created > 0 {
            self.rule_repo
                .record_trigger(rule.id, created as i64, Utc::now())
                .await?;
        }

        Ok((created, sent))
    }

    /// Resolve where a rule's alerts go: the scoped pod's destinations,
    /// or every active pod's destinations for unscoped rules.
    async fn destinations_for(&self, rule: &Rule) -> AppResult<Vec<ChannelDestination>> {
        match rule.pod_id {
            Some(pod_id) => self.pod_repo.active_destinations_for_pod(pod_id).await,
            None => self.pod_repo.all_active_destinations().await,
        }
    }
}
