//! Stats handler.

use axum::Json;
use axum::extract::State;

use watchtower_service::WatchtowerStats;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/watchtower/stats
pub async fn snapshot(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<WatchtowerStats>>, ApiError> {
    let stats = state.stats_service.snapshot().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
