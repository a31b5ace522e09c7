//! Route definitions for the Watchtower HTTP API.
//!
//! All domain routes are mounted under `/api/watchtower`; the health
//! endpoints live at the root. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    let watchtower_routes = Router::new()
        .merge(cron_routes())
        .merge(rule_routes())
        .merge(alert_routes())
        .merge(lookup_routes());

    Router::new()
        .nest("/api/watchtower", watchtower_routes)
        .merge(health_routes())
        .with_state(state)
}

/// Cron trigger endpoint, reachable by GET or POST since external cron
/// services differ in what they send.
fn cron_routes() -> Router<AppState> {
    Router::new().route(
        "/cron",
        get(handlers::cron::trigger).post(handlers::cron::trigger),
    )
}

/// Rule CRUD.
fn rule_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/rules",
            get(handlers::rules::list).post(handlers::rules::create),
        )
        .route(
            "/rules/{id}",
            get(handlers::rules::get)
                .put(handlers::rules::update)
                .delete(handlers::rules::delete),
        )
        .route("/rules/{id}/toggle", put(handlers::rules::toggle))
}

/// Alert listing and acknowledgement.
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(handlers::alerts::list))
        .route(
            "/alerts/acknowledge-bulk",
            put(handlers::alerts::acknowledge_bulk),
        )
        .route("/alerts/{id}", get(handlers::alerts::get))
        .route(
            "/alerts/{id}/acknowledge",
            put(handlers::alerts::acknowledge),
        )
        .route("/alerts/{id}", delete(handlers::alerts::delete))
}

/// Stats, pods, and destination lookups.
fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::stats::snapshot))
        .route("/pods", get(handlers::pods::list))
        .route("/channel-ids", get(handlers::pods::channel_ids))
}

/// Health endpoints.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
