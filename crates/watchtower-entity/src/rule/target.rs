//! Monitorable target tables.
//!
//! The set of tables a rule may watch is closed, and so is the set of
//! fields a condition may reference per table. Anything outside these
//! lists is rejected at rule-creation time instead of surfacing as a
//! silent non-match during evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A metric table the evaluation job can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "target_table", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TargetTable {
    /// Latest Facebook Ads snapshot per ad account.
    RefreshSnapshotMetrics,
    /// Finance rollup per client brand.
    FinanceMetrics,
    /// Conversion-rate metrics per client brand.
    CvrMetrics,
    /// Team communication audit counters per channel.
    CommunicationAudit,
}

impl TargetTable {
    /// The SQL table name.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::RefreshSnapshotMetrics => "refresh_snapshot_metrics",
            Self::FinanceMetrics => "finance_metrics",
            Self::CvrMetrics => "cvr_metrics",
            Self::CommunicationAudit => "communication_audit",
        }
    }

    /// The column holding the natural key of a row (ad account, brand,
    /// channel). Used as the alert dedup key together with the rule id.
    pub fn entity_key_column(&self) -> &'static str {
        match self {
            Self::RefreshSnapshotMetrics => "account_id",
            Self::FinanceMetrics => "brand",
            Self::CvrMetrics => "brand",
            Self::CommunicationAudit => "channel_ref",
        }
    }

    /// Fields a condition may reference on this table.
    ///
    /// `previous_*` columns carry the prior period's value and back the
    /// percentage-change operators.
    pub fn allowed_fields(&self) -> &'static [&'static str] {
        match self {
            Self::RefreshSnapshotMetrics => &[
                "spend",
                "revenue",
                "roas_timeframe",
                "cpa",
                "ctr",
                "impressions",
                "clicks",
                "previous_spend",
                "previous_roas_timeframe",
            ],
            Self::FinanceMetrics => &[
                "gross_revenue",
                "net_revenue",
                "ad_spend",
                "margin_pct",
                "outstanding_invoices",
                "previous_gross_revenue",
            ],
            Self::CvrMetrics => &[
                "sessions",
                "orders",
                "cvr_pct",
                "aov",
                "previous_cvr_pct",
            ],
            Self::CommunicationAudit => &[
                "messages_sent",
                "messages_failed",
                "response_time_minutes",
                "unanswered_count",
            ],
        }
    }

    /// Whether a condition may reference the given field on this table.
    pub fn allows_field(&self, field: &str) -> bool {
        self.allowed_fields().contains(&field)
    }

    /// All monitorable tables.
    pub fn all() -> &'static [TargetTable] {
        &[
            Self::RefreshSnapshotMetrics,
            Self::FinanceMetrics,
            Self::CvrMetrics,
            Self::CommunicationAudit,
        ]
    }
}

impl fmt::Display for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

impl FromStr for TargetTable {
    type Err = watchtower_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "refresh_snapshot_metrics" => Ok(Self::RefreshSnapshotMetrics),
            "finance_metrics" => Ok(Self::FinanceMetrics),
            "cvr_metrics" => Ok(Self::CvrMetrics),
            "communication_audit" => Ok(Self::CommunicationAudit),
            _ => Err(watchtower_core::AppError::validation(format!(
                "Unknown target table: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_fields_are_closed() {
        assert!(TargetTable::RefreshSnapshotMetrics.allows_field("roas_timeframe"));
        assert!(!TargetTable::RefreshSnapshotMetrics.allows_field("margin_pct"));
        assert!(!TargetTable::FinanceMetrics.allows_field("roas_timeframe"));
    }

    #[test]
    fn test_round_trip_table_names() {
        for table in TargetTable::all() {
            let parsed: TargetTable = table.table_name().parse().unwrap();
            assert_eq!(parsed, *table);
        }
    }
}
