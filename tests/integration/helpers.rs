//! Shared fixture for the integration tests.
//!
//! These tests need a reachable PostgreSQL instance. `config/test.toml`
//! points at a scratch database; override it with
//! `WATCHTOWER__DATABASE__URL` when needed.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use watchtower_api::AppState;
use watchtower_core::config::AppConfig;

/// One fully wired application instance over a clean database.
pub struct TestApp {
    /// Router for in-process requests.
    pub router: Router,
    /// The shared state, exposed so tests can drive the evaluation job
    /// directly.
    pub state: AppState,
    /// Pool for direct fixture queries.
    pub db_pool: PgPool,
    /// The configured cron secret.
    pub cron_key: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = AppConfig::load("test").expect("Failed to load test config");

        let db = watchtower_database::connection::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        let db_pool = db.into_pool();

        watchtower_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let cron_key = config.watchtower.cron_secret.clone();
        let state = AppState::build(config, db_pool.clone()).expect("Failed to build app state");
        let router = watchtower_api::build_app(state.clone());

        Self {
            router,
            state,
            db_pool,
            cron_key,
        }
    }

    async fn clean_database(pool: &PgPool) {
        let tables = [
            "alerts",
            "rules",
            "channel_destinations",
            "pods",
            "refresh_snapshot_metrics",
            "finance_metrics",
            "cvr_metrics",
            "communication_audit",
        ];

        for table in &tables {
            let query = format!("DELETE FROM {table}");
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Insert an active daily rule on `finance_metrics` and return its id.
    pub async fn create_rule(
        &self,
        name: &str,
        field: &str,
        op: &str,
        threshold: f64,
        parent: Option<Uuid>,
    ) -> Uuid {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"INSERT INTO rules
               (id, name, target_table, condition_field, condition_op, threshold,
                severity, schedule, is_active, parent_rule_id)
               VALUES ($1, $2, 'finance_metrics'::target_table, $3, $4::condition_op, $5,
                       'high'::alert_severity, 'daily'::rule_schedule, TRUE, $6)"#,
        )
        .bind(id)
        .bind(name)
        .bind(field)
        .bind(op)
        .bind(threshold)
        .bind(parent)
        .execute(&self.db_pool)
        .await
        .expect("Failed to insert rule");

        id
    }

    /// Upsert one finance row for a brand.
    pub async fn insert_finance_row(&self, brand: &str, gross_revenue: f64) {
        sqlx::query(
            "INSERT INTO finance_metrics (brand, gross_revenue) VALUES ($1, $2)
             ON CONFLICT (brand) DO UPDATE SET gross_revenue = EXCLUDED.gross_revenue",
        )
        .bind(brand)
        .bind(gross_revenue)
        .execute(&self.db_pool)
        .await
        .expect("Failed to insert metric row");
    }

    /// Insert an open alert directly and return its id.
    pub async fn insert_alert(&self, rule_id: Uuid, entity_key: &str) -> Uuid {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"INSERT INTO alerts
               (id, rule_id, entity_key, target_table, severity, message,
                metric_value, threshold)
               VALUES ($1, $2, $3, 'finance_metrics'::target_table,
                       'high'::alert_severity, $4, 900, 500)"#,
        )
        .bind(id)
        .bind(rule_id)
        .bind(entity_key)
        .bind("gross_revenue is 900 (threshold > 500)")
        .execute(&self.db_pool)
        .await
        .expect("Failed to insert alert");

        id
    }

    pub async fn count_alerts(&self, rule_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM alerts WHERE rule_id = $1")
            .bind(rule_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count alerts")
    }

    pub async fn rule_exists(&self, id: Uuid) -> bool {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rules WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to check rule existence")
    }

    pub async fn latest_alert_id(&self, rule_id: Uuid) -> Uuid {
        sqlx::query_scalar(
            "SELECT id FROM alerts WHERE rule_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(rule_id)
        .fetch_one(&self.db_pool)
        .await
        .expect("No alert found for rule")
    }

    /// Make an in-process HTTP request against the router.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json).expect("Failed to serialize body"),
                )),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}
