//! Rule evaluation schedule enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a rule is picked up by the evaluation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "rule_schedule", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    /// Evaluated by the daily run.
    Daily,
    /// Evaluated by the weekly run.
    Weekly,
    /// Evaluated on every run, whichever window triggered it.
    Immediate,
}

impl Schedule {
    /// Whether a rule with this schedule participates in a run of the
    /// given window. `Immediate` rules ride along with every window.
    pub fn runs_in(&self, window: Schedule) -> bool {
        *self == Self::Immediate || *self == window
    }

    /// Return the schedule as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Immediate => "immediate",
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Schedule {
    type Err = watchtower_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "immediate" => Ok(Self::Immediate),
            _ => Err(watchtower_core::AppError::validation(format!(
                "Invalid schedule: '{s}'. Expected one of: daily, weekly, immediate"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_runs_in_every_window() {
        assert!(Schedule::Immediate.runs_in(Schedule::Daily));
        assert!(Schedule::Immediate.runs_in(Schedule::Weekly));
        assert!(Schedule::Daily.runs_in(Schedule::Daily));
        assert!(!Schedule::Daily.runs_in(Schedule::Weekly));
        assert!(!Schedule::Weekly.runs_in(Schedule::Daily));
    }
}
