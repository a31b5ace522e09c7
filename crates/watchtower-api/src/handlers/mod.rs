//! HTTP handlers, organized by domain.

pub mod alerts;
pub mod cron;
pub mod health;
pub mod pods;
pub mod rules;
pub mod stats;
