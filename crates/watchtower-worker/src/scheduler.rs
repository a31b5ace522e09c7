//! Cron scheduler for the periodic evaluation runs.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use watchtower_core::config::watchtower::WatchtowerConfig;
use watchtower_core::error::AppError;
use watchtower_entity::rule::Schedule;
use watchtower_service::EvaluationJob;

/// Cron-based scheduler driving the evaluation windows.
pub struct CronScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// The evaluation job shared by all registered schedules.
    job: Arc<EvaluationJob>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(job: Arc<EvaluationJob>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, job })
    }

    /// Register the daily and weekly evaluation windows from
    /// configuration.
    pub async fn register_evaluation_windows(
        &self,
        config: &WatchtowerConfig,
    ) -> Result<(), AppError> {
        self.register_window(Schedule::Daily, &config.daily_cron)
            .await?;
        self.register_window(Schedule::Weekly, &config.weekly_cron)
            .await?;

        tracing::info!("All evaluation windows registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Register one evaluation window on the given cron expression.
    async fn register_window(&self, window: Schedule, cron: &str) -> Result<(), AppError> {
        let job = Arc::clone(&self.job);
        let cron_job = CronJob::new_async(cron, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                tracing::debug!(window = %window, "Scheduled evaluation run firing");
                match job.run(window).await {
                    Ok(summary) => tracing::info!(
                        window = %window,
                        rules_processed = summary.rules_processed,
                        alerts_created = summary.alerts_created,
                        notifications_sent = summary.notifications_sent,
                        "Scheduled evaluation run finished"
                    ),
                    Err(e) => tracing::error!(
                        window = %window,
                        "Scheduled evaluation run failed: {e}"
                    ),
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create {window} schedule from '{cron}': {e}"))
        })?;

        self.scheduler.add(cron_job).await.map_err(|e| {
            AppError::internal(format!("Failed to add {window} schedule: {e}"))
        })?;

        tracing::info!("Registered: {window} evaluation ({cron})");
        Ok(())
    }
}
