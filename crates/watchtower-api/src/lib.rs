//! # watchtower-api
//!
//! HTTP API layer for Watchtower built on Axum.
//!
//! Provides the cron trigger endpoint, rule and alert CRUD, stats,
//! pod/destination lookups, health checks, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
