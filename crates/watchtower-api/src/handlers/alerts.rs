//! Alert handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use watchtower_core::types::pagination::PageResponse;
use watchtower_entity::alert::Alert;
use watchtower_entity::rule::{Severity, TargetTable};

use crate::dto::request::{AcknowledgeBulkRequest, AcknowledgeRequest, AlertFilterParams};
use crate::dto::response::{ApiResponse, CountResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::PaginationParams;
use crate::state::AppState;

/// GET /api/watchtower/alerts
pub async fn list(
    State(state): State<AppState>,
    Query(filters): Query<AlertFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Alert>>>, ApiError> {
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
        .alert_service
        .list(
            severity,
            filters.acknowledged,
            target_table,
            filters.rule_id,
            &pagination.page_request(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/watchtower/alerts/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Alert>>, ApiError> {
    let alert = state.alert_service.get(id).await?;
    Ok(Json(ApiResponse::ok(alert)))
}

/// PUT /api/watchtower/alerts/{id}/acknowledge
///
/// Idempotent: re-acknowledging returns the alert unchanged.
pub async fn acknowledge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AcknowledgeRequest>,
) -> Result<Json<ApiResponse<Alert>>, ApiError> {
    let alert = state
        .alert_service
        .acknowledge(id, &req.acknowledged_by)
        .await?;
    Ok(Json(ApiResponse::ok(alert)))
}

/// PUT /api/watchtower/alerts/acknowledge-bulk
pub async fn acknowledge_bulk(
    State(state): State<AppState>,
    Json(req): Json<AcknowledgeBulkRequest>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state
        .alert_service
        .acknowledge_bulk(&req.alert_ids, &req.acknowledged_by)
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// DELETE /api/watchtower/alerts/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.alert_service.delete(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Alert deleted".to_string(),
    })))
}
