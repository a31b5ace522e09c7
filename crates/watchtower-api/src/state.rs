//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use watchtower_core::config::AppConfig;
use watchtower_database::repositories::alert::AlertRepository;
use watchtower_database::repositories::metrics::MetricsRepository;
use watchtower_database::repositories::pod::PodRepository;
use watchtower_database::repositories::rule::RuleRepository;
use watchtower_notify::AlertDispatcher;
use watchtower_service::{AlertService, EvaluationJob, RuleService, StatsService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,

    /// Rule repository.
    pub rule_repo: Arc<RuleRepository>,
    /// Alert repository.
    pub alert_repo: Arc<AlertRepository>,
    /// Pod and destination repository.
    pub pod_repo: Arc<PodRepository>,
    /// Metric table repository.
    pub metrics_repo: Arc<MetricsRepository>,

    /// Rule management service.
    pub rule_service: Arc<RuleService>,
    /// Alert management service.
    pub alert_service: Arc<AlertService>,
    /// Stats service.
    pub stats_service: Arc<StatsService>,
    /// Notification dispatcher.
    pub dispatcher: Arc<AlertDispatcher>,
    /// The evaluation job invoked by the cron endpoint.
    pub evaluation_job: Arc<EvaluationJob>,
}

impl AppState {
    /// Wire up repositories, services, and the evaluation job from a
    /// configuration and database pool.
    pub fn build(config: AppConfig, db_pool: PgPool) -> Result<Self, watchtower_core::AppError> {
        let rule_repo = Arc::new(RuleRepository::new(db_pool.clone()));
        let alert_repo = Arc::new(AlertRepository::new(db_pool.clone()));
        let pod_repo = Arc::new(PodRepository::new(db_pool.clone()));
        let metrics_repo = Arc::new(MetricsRepository::new(db_pool.clone()));

        let dispatcher = Arc::new(AlertDispatcher::from_config(
            &config.notify,
            config.watchtower.dispatch_delay_ms,
        )?);

        let rule_service = Arc::new(RuleService::new(
            Arc::clone(&rule_repo),
            Arc::clone(&pod_repo),
        ));
        let alert_service = Arc::new(AlertService::new(Arc::clone(&alert_repo)));
        let stats_service = Arc::new(StatsService::new(
            Arc::clone(&alert_repo),
            Arc::clone(&rule_repo),
        ));
        let evaluation_job = Arc::new(EvaluationJob::new(
            Arc::clone(&rule_repo),
            Arc::clone(&alert_repo),
            Arc::clone(&pod_repo),
            Arc::clone(&metrics_repo),
            Arc::clone(&dispatcher),
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            rule_repo,
            alert_repo,
            pod_repo,
            metrics_repo,
            rule_service,
            alert_service,
            stats_service,
            dispatcher,
            evaluation_job,
        })
    }
}
