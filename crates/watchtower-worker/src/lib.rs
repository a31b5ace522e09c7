//! # watchtower-worker
//!
//! In-process cron scheduling for the evaluation job. The worker runs
//! the daily and weekly evaluation windows on the expressions from
//! configuration, next to the HTTP server, so deployments without an
//! external cron trigger still evaluate rules.

pub mod scheduler;

pub use scheduler::CronScheduler;
