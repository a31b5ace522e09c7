//! Shared value types: pagination and sorting.

pub mod pagination;
pub mod sorting;
