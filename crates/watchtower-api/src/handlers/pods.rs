//! Pod and channel destination handlers.

use axum::Json;
use axum::extract::{Query, State};

use watchtower_entity::pod::{ChannelDestination, Pod};

use crate::dto::request::ChannelIdsParams;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/watchtower/pods
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Pod>>>, ApiError> {
    let pods = state.pod_repo.find_all().await?;
    Ok(Json(ApiResponse::ok(pods)))
}

/// GET /api/watchtower/channel-ids?rule_id=...
///
/// Resolves where a rule's alerts would be delivered: the scoped pod's
/// active destinations, or every active pod's for unscoped rules.
pub async fn channel_ids(
    State(state): State<AppState>,
    Query(params): Query<ChannelIdsParams>,
) -> Result<Json<ApiResponse<Vec<ChannelDestination>>>, ApiError> {
    let rule = state.rule_service.get(params.rule_id).await?;
    let destinations = match rule.pod_id {
        Some(pod_id) => state.pod_repo.active_destinations_for_pod(pod_id).await?,
        None => state.pod_repo.all_active_destinations().await?,
    };
    Ok(Json(ApiResponse::ok(destinations)))
}
