//! Rule condition: a field, a comparison operator, and a threshold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operator applied between a metric value and a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "condition_op", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConditionOp {
    /// Value is strictly greater than the threshold.
    Gt,
    /// Value is greater than or equal to the threshold.
    Gte,
    /// Value is strictly less than the threshold.
    Lt,
    /// Value is less than or equal to the threshold.
    Lte,
    /// Value equals the threshold.
    Eq,
    /// Value does not equal the threshold.
    Ne,
    /// Percentage change from `previous_<field>` exceeds the threshold.
    PctChangeGt,
    /// Percentage change from `previous_<field>` is below the threshold.
    PctChangeLt,
}

impl ConditionOp {
    /// The symbol used when interpolating the operator into an alert
    /// message.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::PctChangeGt => "pct change >",
            Self::PctChangeLt => "pct change <",
        }
    }

    /// Whether this operator compares a percentage change rather than the
    /// raw value, and therefore needs a `previous_<field>` baseline.
    pub fn is_pct_change(&self) -> bool {
        matches!(self, Self::PctChangeGt | Self::PctChangeLt)
    }

    /// Return the operator as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::PctChangeGt => "pct_change_gt",
            Self::PctChangeLt => "pct_change_lt",
        }
    }
}

impl fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConditionOp {
    type Err = watchtower_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gt" | ">" => Ok(Self::Gt),
            "gte" | ">=" => Ok(Self::Gte),
            "lt" | "<" => Ok(Self::Lt),
            "lte" | "<=" => Ok(Self::Lte),
            "eq" | "=" | "==" => Ok(Self::Eq),
            "ne" | "!=" => Ok(Self::Ne),
            "pct_change_gt" => Ok(Self::PctChangeGt),
            "pct_change_lt" => Ok(Self::PctChangeLt),
            _ => Err(watchtower_core::AppError::validation(format!(
                "Unknown condition operator: '{s}'"
            ))),
        }
    }
}

/// A rule's condition over a single metric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// The metric column the condition reads.
    pub field: String,
    /// The comparison operator.
    pub op: ConditionOp,
    /// The threshold to compare against.
    pub threshold: f64,
}

impl Condition {
    /// Create a new condition.
    pub fn new(field: impl Into<String>, op: ConditionOp, threshold: f64) -> Self {
        Self {
            field: field.into(),
            op,
            threshold,
        }
    }

    /// The baseline column used by percentage-change operators.
    pub fn baseline_field(&self) -> String {
        format!("previous_{}", self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_symbols() {
        assert_eq!(ConditionOp::Gt.symbol(), ">");
        assert_eq!(ConditionOp::Lte.symbol(), "<=");
    }

    #[test]
    fn test_op_parse_accepts_symbols() {
        assert_eq!("<".parse::<ConditionOp>().unwrap(), ConditionOp::Lt);
        assert_eq!("gte".parse::<ConditionOp>().unwrap(), ConditionOp::Gte);
        assert!("~=".parse::<ConditionOp>().is_err());
    }

    #[test]
    fn test_baseline_field() {
        let cond = Condition::new("cvr_pct", ConditionOp::PctChangeLt, -20.0);
        assert_eq!(cond.baseline_field(), "previous_cvr_pct");
    }
}
