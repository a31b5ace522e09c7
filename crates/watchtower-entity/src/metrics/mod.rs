//! Fetched metric rows.

pub mod model;

pub use model::MetricRow;
