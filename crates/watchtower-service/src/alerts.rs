//! Alert management service.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use watchtower_core::error::AppError;
use watchtower_core::result::AppResult;
use watchtower_core::types::pagination::{PageRequest, PageResponse};
use watchtower_database::repositories::alert::AlertRepository;
use watchtower_entity::alert::Alert;
use watchtower_entity::rule::{Severity, TargetTable};

/// Alert listing, acknowledgement, and deletion.
#[derive(Debug, Clone)]
pub struct AlertService {
    alert_repo: Arc<AlertRepository>,
}

impl AlertService {
    /// Creates a new alert service.
    pub fn new(alert_repo: Arc<AlertRepository>) -> Self {
        Self { alert_repo }
    }

    /// Fetch an alert or fail with not-found.
    pub async fn get(&self, id: Uuid) -> AppResult<Alert> {
        self.alert_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Alert not found: {id}")))
    }

    /// List alerts with optional filters, newest first.
    pub async fn list(
        &self,
        severity: Option<Severity>,
        acknowledged: Option<bool>,
        target_table: Option<TargetTable>,
        rule_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Alert>> {
        self.alert_repo
            .list(severity, acknowledged, target_table, rule_id, page)
            .await
    }

    /// Acknowledge an alert. Idempotent: acknowledging an already
    /// acknowledged alert returns it unchanged instead of failing.
    pub async fn acknowledge(&self, id: Uuid, by: &str) -> AppResult<Alert> {
        if let Some(alert) = self.alert_repo.acknowledge(id, by, Utc::now()).await? {
            return Ok(alert);
        }
        // The update touched nothing: either the alert is already
        // acknowledged (fine) or it does not exist.
        self.get(id).await
    }

    /// Acknowledge a batch of alerts; returns how many actually changed.
    pub async fn acknowledge_bulk(&self, ids: &[Uuid], by: &str) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::validation("No alert ids provided"));
        }
        self.alert_repo.acknowledge_bulk(ids, by, Utc::now()).await
    }

    /// Delete an alert.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.alert_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Alert not found: {id}")));
        }
        Ok(())
    }
}
