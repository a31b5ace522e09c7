//! Rule management service.

use std::sync::Arc;

use uuid::Uuid;

use watchtower_core::error::AppError;
use watchtower_core::result::AppResult;
use watchtower_core::types::pagination::{PageRequest, PageResponse};
use watchtower_core::types::sorting::SortDirection;
use watchtower_database::repositories::pod::PodRepository;
use watchtower_database::repositories::rule::RuleRepository;
use watchtower_entity::rule::{Condition, CreateRule, Rule, Severity, TargetTable, UpdateRule};

/// Rule CRUD with validation against each target table's closed column
/// set.
#[derive(Debug, Clone)]
pub struct RuleService {
    rule_repo: Arc<RuleRepository>,
    pod_repo: Arc<PodRepository>,
}

impl RuleService {
    /// Creates a new rule service.
    pub fn new(rule_repo: Arc<RuleRepository>, pod_repo: Arc<PodRepository>) -> Self {
        Self {
            rule_repo,
            pod_repo,
        }
    }

    /// List rules with optional filters.
    pub async fn list(
        &self,
        severity: Option<Severity>,
        is_active: Option<bool>,
        target_table: Option<TargetTable>,
        sort: SortDirection,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Rule>> {
        self.rule_repo
            .list(severity, is_active, target_table, sort, page)
            .await
    }

    /// Fetch a rule or fail with not-found.
    pub async fn get(&self, id: Uuid) -> AppResult<Rule> {
        self.rule_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Rule not found: {id}")))
    }

    /// Create a rule after validating its condition and references.
    pub async fn create(&self, params: CreateRule) -> AppResult<Rule> {
        if params.name.trim().is_empty() {
            return Err(AppError::validation("Rule name must not be empty"));
        }
        validate_condition(params.target_table, &params.condition)?;

        if let Some(pod_id) = params.pod_id {
            if self.pod_repo.find_by_id(pod_id).await?.is_none() {
                return Err(AppError::validation(format!("Unknown pod: {pod_id}")));
            }
        }
        if let Some(parent_id) = params.parent_rule_id {
            if self.rule_repo.find_by_id(parent_id).await?.is_none() {
                return Err(AppError::validation(format!(
                    "Unknown parent rule: {parent_id}"
                )));
            }
        }

        self.rule_repo.create(&params).await
    }

    /// Apply a partial update. The target table is immutable, so an
    /// updated condition is validated against the stored table.
    pub async fn update(&self, id: Uuid, update: UpdateRule) -> AppResult<Rule> {
        let existing = self.get(id).await?;

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Rule name must not be empty"));
            }
        }
        if let Some(condition) = &update.condition {
            validate_condition(existing.target_table, condition)?;
        }
        if let Some(Some(pod_id)) = update.pod_id {
            if self.pod_repo.find_by_id(pod_id).await?.is_none() {
                return Err(AppError::validation(format!("Unknown pod: {pod_id}")));
            }
        }

        self.rule_repo
            .update(id, &update)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Rule not found: {id}")))
    }

    /// Flip the active flag.
    pub async fn toggle_active(&self, id: Uuid) -> AppResult<Rule> {
        self.rule_repo
            .toggle_active(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Rule not found: {id}")))
    }

    /// Delete a rule and its dependent group members. Alerts referencing
    /// the deleted rules remain as historical records.
    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let removed = self.rule_repo.delete_group(id).await?;
        if removed == 0 {
            return Err(AppError::not_found(format!("Rule not found: {id}")));
        }
        Ok(removed)
    }
}

/// Check a condition against the target table's allowed columns. For
/// percentage-change operators the baseline column must exist too.
fn validate_condition(table: TargetTable, condition: &Condition) -> AppResult<()> {
    if !condition.threshold.is_finite() {
        return Err(AppError::validation("Threshold must be a finite number"));
    }
    if !table.allows_field(&condition.field) {
        return Err(AppError::validation(format!(
            "Field '{}' is not monitored on table '{}'",
            condition.field, table
        )));
    }
    if condition.op.is_pct_change() && !table.allows_field(&condition.baseline_field()) {
        return Err(AppError::validation(format!(
            "Field '{}' has no '{}' baseline on table '{}'",
            condition.field,
            condition.baseline_field(),
            table
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchtower_entity::rule::ConditionOp;

    #[test]
    fn test_validate_condition_accepts_known_field() {
        let cond = Condition::new("roas_timeframe", ConditionOp::Lt, 1.5);
        assert!(validate_condition(TargetTable::RefreshSnapshotMetrics, &cond).is_ok());
    }

    #[test]
    fn test_validate_condition_rejects_unknown_field() {
        let cond = Condition::new("definitely_not_a_column", ConditionOp::Gt, 1.0);
        let err = validate_condition(TargetTable::FinanceMetrics, &cond)
            .expect_err("unknown field must be rejected");
        assert_eq!(err.kind, watchtower_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_validate_condition_requires_pct_change_baseline() {
        // cpa has no previous_cpa companion column.
        let cond = Condition::new("cpa", ConditionOp::PctChangeGt, 25.0);
        assert!(validate_condition(TargetTable::RefreshSnapshotMetrics, &cond).is_err());

        let with_baseline = Condition::new("spend", ConditionOp::PctChangeGt, 25.0);
        assert!(
            validate_condition(TargetTable::RefreshSnapshotMetrics, &with_baseline).is_ok()
        );
    }

    #[test]
    fn test_validate_condition_rejects_non_finite_threshold() {
        let cond = Condition::new("spend", ConditionOp::Gt, f64::NAN);
        assert!(validate_condition(TargetTable::RefreshSnapshotMetrics, &cond).is_err());
    }
}
