//! Rule entity: model, condition, and the enums that classify a rule.

pub mod condition;
pub mod model;
pub mod schedule;
pub mod severity;
pub mod target;

pub use condition::{Condition, ConditionOp};
pub use model::{CreateRule, Rule, UpdateRule};
pub use schedule::Schedule;
pub use severity::Severity;
pub use target::TargetTable;
