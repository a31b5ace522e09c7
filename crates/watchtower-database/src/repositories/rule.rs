//! Rule repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use watchtower_core::error::{AppError, ErrorKind};
use watchtower_core::result::AppResult;
use watchtower_core::types::pagination::{PageRequest, PageResponse};
use watchtower_core::types::sorting::SortDirection;
use watchtower_entity::rule::{CreateRule, Rule, Schedule, Severity, TargetTable, UpdateRule};

/// Repository for rule CRUD and trigger tracking.
#[derive(Debug, Clone)]
pub struct RuleRepository {
    pool: PgPool,
}

impl RuleRepository {
    /// Create a new rule repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a rule by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rule>> {
        sqlx::query_as::<_, Rule>("SELECT * FROM rules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find rule", e))
    }

    /// List rules with optional filters, sorted by creation time.
    pub async fn list(
        &self,
        severity: Option<Severity>,
        is_active: Option<bool>,
        target_table: Option<TargetTable>,
        sort: SortDirection,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Rule>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if severity.is_some() {
            conditions.push(format!("severity = ${param_idx}"));
            param_idx += 1;
        }
        if is_active.is_some() {
            conditions.push(format!("is_active = ${param_idx}"));
            param_idx += 1;
        }
        if target_table.is_some() {
            conditions.push(format!("target_table = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM rules {where_clause}");
        let select_sql = format!(
            "SELECT * FROM rules {where_clause} ORDER BY created_at {} LIMIT ${param_idx} OFFSET ${}",
            sort.as_sql(),
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, Rule>(&select_sql);

        if let Some(sev) = severity {
            count_query = count_query.bind(sev);
            select_query = select_query.bind(sev);
        }
        if let Some(active) = is_active {
            count_query = count_query.bind(active);
            select_query = select_query.bind(active);
        }
        if let Some(table) = target_table {
            count_query = count_query.bind(table);
            select_query = select_query.bind(table);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count rules", e))?;

        let rules = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list rules", e))?;

        Ok(PageResponse::new(
            rules,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Fetch the active rules participating in the given evaluation
    /// window (`immediate` rules ride along with every window).
    pub async fn find_for_window(&self, window: Schedule) -> AppResult<Vec<Rule>> {
        sqlx::query_as::<_, Rule>(
            "SELECT * FROM rules WHERE is_active = TRUE \
             AND (schedule = $1 OR schedule = 'immediate') \
             ORDER BY created_at",
        )
        .bind(window)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch window rules", e))
    }

    /// Create a rule.
    pub async fn create(&self, params: &CreateRule) -> AppResult<Rule> {
        sqlx::query_as::<_, Rule>(
            "INSERT INTO rules (name, target_table, condition_field, condition_op, threshold, \
             severity, schedule, is_active, pod_id, parent_rule_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(&params.name)
        .bind(params.target_table)
        .bind(&params.condition.field)
        .bind(params.condition.op)
        .bind(params.condition.threshold)
        .bind(params.severity)
        .bind(params.schedule)
        .bind(params.is_active)
        .bind(params.pod_id)
        .bind(params.parent_rule_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create rule", e))
    }

    /// Apply a partial update. Returns the updated rule, or `None` when
    /// the rule does not exist. Last write wins on concurrent updates.
    pub async fn update(&self, id: Uuid, update: &UpdateRule) -> AppResult<Option<Rule>> {
        let (field, op, threshold) = match &update.condition {
            Some(cond) => (Some(cond.field.clone()), Some(cond.op), Some(cond.threshold)),
            None => (None, None, None),
        };

        sqlx::query_as::<_, Rule>(
            "UPDATE rules SET \
                name = COALESCE($2, name), \
                condition_field = COALESCE($3, condition_field), \
                condition_op = COALESCE($4, condition_op), \
                threshold = COALESCE($5, threshold), \
                severity = COALESCE($6, severity), \
                schedule = COALESCE($7, schedule), \
                pod_id = CASE WHEN $8 THEN $9 ELSE pod_id END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(field)
        .bind(op)
        .bind(threshold)
        .bind(update.severity)
        .bind(update.schedule)
        .bind(update.pod_id.is_some())
        .bind(update.pod_id.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update rule", e))
    }

    /// Flip the active flag. Returns the updated rule.
    pub async fn toggle_active(&self, id: Uuid) -> AppResult<Option<Rule>> {
        sqlx::query_as::<_, Rule>(
            "UPDATE rules SET is_active = NOT is_active, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to toggle rule", e))
    }

    /// Delete a rule together with its dependent group members
    /// (rules whose `parent_rule_id` points at it). Alerts referencing
    /// the deleted rules are left untouched.
    pub async fn delete_group(&self, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM rules WHERE id = $1 OR parent_rule_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete rule group", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Record that a rule produced `alerts` new alerts during a run.
    pub async fn record_trigger(
        &self,
        id: Uuid,
        alerts: i64,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE rules SET trigger_count = trigger_count + $2, last_triggered_at = $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(alerts)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record trigger", e))?;
        Ok(())
    }

    /// Count active rules.
    pub async fn count_active(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM rules WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count active rules", e)
            })
    }
}
