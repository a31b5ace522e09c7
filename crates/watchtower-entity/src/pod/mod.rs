//! Pod and channel destination entities.

pub mod model;

pub use model::{ChannelDestination, ChannelKind, Pod};
