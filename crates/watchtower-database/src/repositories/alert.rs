//! Alert repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use watchtower_core::error::{AppError, ErrorKind};
use watchtower_core::result::AppResult;
use watchtower_core::types::pagination::{PageRequest, PageResponse};
use watchtower_entity::alert::{Alert, NewAlert};
use watchtower_entity::rule::{Severity, TargetTable};

/// Repository for alert persistence, acknowledgement, and stats.
#[derive(Debug, Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    /// Create a new alert repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an alert by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        sqlx::query_as::<_, Alert>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find alert", e))
    }

    /// Insert a new alert.
    ///
    /// The partial unique index on `(rule_id, entity_key) WHERE NOT
    /// is_acknowledged` turns a lost race between concurrent evaluation
    /// runs into `ON CONFLICT DO NOTHING`; `None` means another run
    /// already created the alert.
    pub async fn create(&self, draft: &NewAlert) -> AppResult<Option<Alert>> {
        sqlx::query_as::<_, Alert>(
            "INSERT INTO alerts (rule_id, entity_key, target_table, severity, message, \
             metric_value, threshold) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (rule_id, entity_key) WHERE NOT is_acknowledged DO NOTHING \
             RETURNING *",
        )
        .bind(draft.rule_id)
        .bind(&draft.entity_key)
        .bind(draft.target_table)
        .bind(draft.severity)
        .bind(&draft.message)
        .bind(draft.metric_value)
        .bind(draft.threshold)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create alert", e))
    }

    /// Dedup check: does an unacknowledged alert already exist for this
    /// `(rule, entity)` pair?
    pub async fn exists_unacknowledged(
        &self,
        rule_id: Uuid,
        entity_key: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM alerts \
             WHERE rule_id = $1 AND entity_key = $2 AND is_acknowledged = FALSE)",
        )
        .bind(rule_id)
        .bind(entity_key)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed dedup check", e))
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
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if severity.is_some() {
            conditions.push(format!("severity = ${param_idx}"));
            param_idx += 1;
        }
        if acknowledged.is_some() {
            conditions.push(format!("is_acknowledged = ${param_idx}"));
            param_idx += 1;
        }
        if target_table.is_some() {
            conditions.push(format!("target_table = ${param_idx}"));
            param_idx += 1;
        }
        if rule_id.is_some() {
            conditions.push(format!("rule_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM alerts {where_clause}");
        let select_sql = format!(
            "SELECT * FROM alerts {where_clause} ORDER BY created_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, Alert>(&select_sql);

        if let Some(sev) = severity {
            count_query = count_query.bind(sev);
            select_query = select_query.bind(sev);
        }
        if let Some(ack) = acknowledged {
            count_query = count_query.bind(ack);
            select_query = select_query.bind(ack);
        }
        if let Some(table) = target_table {
            count_query = count_query.bind(table);
            select_query = select_query.bind(table);
        }
        if let Some(rid) = rule_id {
            count_query = count_query.bind(rid);
            select_query = select_query.bind(rid);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count alerts", e))?;

        let alerts = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list alerts", e))?;

        Ok(PageResponse::new(
            alerts,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Acknowledge an alert. Only touches rows that are still
    /// unacknowledged, so repeated calls change nothing; `None` means the
    /// row was already acknowledged or does not exist.
    pub async fn acknowledge(
        &self,
        id: Uuid,
        by: &str,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Alert>> {
        sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET is_acknowledged = TRUE, acknowledged_at = $3, acknowledged_by = $2 \
             WHERE id = $1 AND is_acknowledged = FALSE RETURNING *",
        )
        .bind(id)
        .bind(by)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acknowledge alert", e))
    }

    /// Acknowledge a batch of alerts; returns how many rows changed.
    pub async fn acknowledge_bulk(
        &self,
        ids: &[Uuid],
        by: &str,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE alerts SET is_acknowledged = TRUE, acknowledged_at = $3, acknowledged_by = $2 \
             WHERE id = ANY($1) AND is_acknowledged = FALSE",
        )
        .bind(ids)
        .bind(by)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to bulk acknowledge", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Delete an alert. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete alert", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Total alert count.
    pub async fn count_total(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM alerts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count alerts", e))
    }

    /// Unacknowledged alert count.
    pub async fn count_unacknowledged(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM alerts WHERE is_acknowledged = FALSE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count unacknowledged", e)
            })
    }

    /// Alert counts grouped by severity.
    pub async fn count_by_severity(&self) -> AppResult<Vec<(Severity, i64)>> {
        sqlx::query_as::<_, (Severity, i64)>(
            "SELECT severity, COUNT(*) FROM alerts GROUP BY severity",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count by severity", e)
        })
    }

    /// Timestamp of the most recently created alert, if any.
    pub async fn latest_created_at(&self) -> AppResult<Option<DateTime<Utc>>> {
        sqlx::query_scalar("SELECT MAX(created_at) FROM alerts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to fetch latest alert time", e)
            })
    }
}
