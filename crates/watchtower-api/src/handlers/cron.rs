//! The cron trigger endpoint.
//!
//! An external scheduler (cron-job.org or similar) calls this endpoint
//! on the daily and weekly cadence. The shared secret is mandatory;
//! a missing or wrong key is a 401.

use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;

use watchtower_core::error::AppError;
use watchtower_entity::rule::Schedule;

use crate::dto::request::CronParams;
use crate::dto::response::{ApiResponse, CronRunResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET|POST /api/watchtower/cron?schedule=daily|weekly&key=...
pub async fn trigger(
    State(state): State<AppState>,
    Query(params): Query<CronParams>,
) -> Result<Json<ApiResponse<CronRunResponse>>, ApiError> {
    if params.key != state.config.watchtower.cron_secret {
        return Err(AppError::unauthorized("Invalid cron key").into());
    }

    let schedule: Schedule = params.schedule.parse()?;
    if schedule == Schedule::Immediate {
        return Err(AppError::validation(
            "Cron trigger accepts 'daily' or 'weekly'",
        )
        .into());
    }

    let summary = state.evaluation_job.run(schedule).await?;

    Ok(Json(ApiResponse::ok(CronRunResponse {
        schedule,
        rules_processed: summary.rules_processed,
        alerts_created: summary.alerts_created,
        notifications_sent: summary.notifications_sent,
        timestamp: Utc::now(),
    })))
}
