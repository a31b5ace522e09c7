//! Repository implementations, one per aggregate.

pub mod alert;
pub mod metrics;
pub mod pod;
pub mod rule;

pub use alert::AlertRepository;
pub use metrics::MetricsRepository;
pub use pod::PodRepository;
pub use rule::RuleRepository;
