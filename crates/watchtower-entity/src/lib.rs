//! # watchtower-entity
//!
//! Domain entity models for Automize Watchtower. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod alert;
pub mod metrics;
pub mod pod;
pub mod rule;
