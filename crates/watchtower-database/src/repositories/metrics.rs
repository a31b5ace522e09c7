//! Read-only access to the monitored metric tables.
//!
//! Each target table holds the current snapshot per entity (one row per
//! ad account / brand / channel), refreshed by the upstream ingestion
//! pipelines. The evaluation job only ever reads them.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use watchtower_core::error::{AppError, ErrorKind};
use watchtower_core::result::AppResult;
use watchtower_entity::metrics::MetricRow;
use watchtower_entity::rule::TargetTable;

/// Repository producing [`MetricRow`]s from the monitored tables.
#[derive(Debug, Clone)]
pub struct MetricsRepository {
    pool: PgPool,
}

impl MetricsRepository {
    /// Create a new metrics repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the current rows of a target table, optionally scoped to a
    /// pod.
    ///
    /// The table and key column come from the closed [`TargetTable`]
    /// enum, never from user input, so interpolating them is safe.
    pub async fn fetch_rows(
        &self,
        table: TargetTable,
        pod_id: Option<Uuid>,
    ) -> AppResult<Vec<MetricRow>> {
        let sql = match pod_id {
            Some(_) => format!(
                "SELECT {key} AS entity_key, pod_id, captured_at, to_jsonb(t) AS fields \
                 FROM {table} t WHERE pod_id = $1",
                key = table.entity_key_column(),
                table = table.table_name(),
            ),
            None => format!(
                "SELECT {key} AS entity_key, pod_id, captured_at, to_jsonb(t) AS fields \
                 FROM {table} t",
                key = table.entity_key_column(),
                table = table.table_name(),
            ),
        };

        let mut query = sqlx::query(&sql);
        if let Some(pid) = pod_id {
            query = query.bind(pid);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to fetch rows from {}", table.table_name()),
                e,
            )
        })?;

        let mut metric_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let fields: serde_json::Value = row.try_get("fields").map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Malformed metric row", e)
            })?;
            let serde_json::Value::Object(fields) = fields else {
                return Err(AppError::database("Metric row did not serialize to an object"));
            };
            metric_rows.push(MetricRow {
                entity_key: row.try_get("entity_key").map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Malformed metric row", e)
                })?,
                pod_id: row.try_get("pod_id").map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Malformed metric row", e)
                })?,
                captured_at: row.try_get("captured_at").map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Malformed metric row", e)
                })?,
                fields,
            });
        }

        Ok(metric_rows)
    }
}
