//! # watchtower-service
//!
//! Business logic layer for Watchtower. The condition evaluator is a
//! pure function over fetched rows; the services orchestrate
//! repositories and the dispatcher to implement the application-level
//! use cases.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references.

pub mod alerts;
pub mod engine;
pub mod evaluator;
pub mod rules;
pub mod stats;

pub use alerts::AlertService;
pub use engine::{EvaluationJob, EvaluationSummary};
pub use evaluator::{ConditionMatch, evaluate};
pub use rules::RuleService;
pub use stats::{StatsService, WatchtowerStats};
