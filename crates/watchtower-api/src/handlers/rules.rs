//! Rule CRUD handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use watchtower_core::types::pagination::PageResponse;
use watchtower_entity::rule::{CreateRule, Rule, Severity, TargetTable, UpdateRule};

use crate::dto::request::RuleFilterParams;
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::PaginationParams;
use crate::state::AppState;

/// GET /api/watchtower/rules
pub async fn list(
    State(state): State<AppState>,
    Query(filters): Query<RuleFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Rule>>>, ApiError> {
    let severity = filters
        .severity
        .as_deref()
        .map(str::parse::<Severity>)
        .transpose()?;
    let target_table = filters
        .target_table
        .as_deref()
        .map(str::parse::<TargetTable>)
        .transpose()?;

    let page = state
        .rule_service
        .list(
            severity,
            filters.is_active,
            target_table,
            pagination.sort_direction(),
            &pagination.page_request(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/watchtower/rules/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Rule>>, ApiError> {
    let rule = state.rule_service.get(id).await?;
    Ok(Json(ApiResponse::ok(rule)))
}

/// POST /api/watchtower/rules
pub async fn create(
    State(state): State<AppState>,
    Json(params): Json<CreateRule>,
) -> Result<Json<ApiResponse<Rule>>, ApiError> {
    let rule = state.rule_service.create(params).await?;
    Ok(Json(ApiResponse::ok(rule)))
}

/// PUT /api/watchtower/rules/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateRule>,
) -> Result<Json<ApiResponse<Rule>>, ApiError> {
    let rule = state.rule_service.update(id, update).await?;
    Ok(Json(ApiResponse::ok(rule)))
}

/// PUT /api/watchtower/rules/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Rule>>, ApiError> {
    let rule = state.rule_service.toggle_active(id).await?;
    Ok(Json(ApiResponse::ok(rule)))
}

/// DELETE /api/watchtower/rules/{id}
///
/// Deletes the rule and its dependent group members; alerts stay.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let removed = state.rule_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count: removed })))
}
