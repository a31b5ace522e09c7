//! Pod and channel destination repository implementation.
//!
//! Destination rows are static configuration, read-only from the
//! evaluation/dispatch path; there are no write methods here.

use sqlx::PgPool;
use uuid::Uuid;

use watchtower_core::error::{AppError, ErrorKind};
use watchtower_core::result::AppResult;
use watchtower_entity::pod::{ChannelDestination, Pod};

/// Repository for pods and their notification destinations.
#[derive(Debug, Clone)]
pub struct PodRepository {
    pool: PgPool,
}

impl PodRepository {
    /// Create a new pod repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All pods, active and inactive, for the listing endpoint.
    pub async fn find_all(&self) -> AppResult<Vec<Pod>> {
        sqlx::query_as::<_, Pod>("SELECT * FROM pods ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list pods", e))
    }

    /// Find a pod by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pod>> {
        sqlx::query_as::<_, Pod>("SELECT * FROM pods WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find pod", e))
    }

    /// All destinations for a pod, active or not.
    pub async fn find_destinations(&self, pod_id: Uuid) -> AppResult<Vec<ChannelDestination>> {
        sqlx::query_as::<_, ChannelDestination>(
            "SELECT * FROM channel_destinations WHERE pod_id = $1 ORDER BY channel, address",
        )
        .bind(pod_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list destinations", e))
    }

    /// Active destinations for a single pod, skipping inactive pods.
    pub async fn active_destinations_for_pod(
        &self,
        pod_id: Uuid,
    ) -> AppResult<Vec<ChannelDestination>> {
        sqlx::query_as::<_, ChannelDestination>(
            "SELECT d.* FROM channel_destinations d \
             JOIN pods p ON p.id = d.pod_id \
             WHERE d.pod_id = $1 AND d.is_active = TRUE AND p.is_active = TRUE",
        )
        .bind(pod_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to fetch pod destinations", e)
        })
    }

    /// Active destinations across all active pods, for unscoped rules.
    pub async fn all_active_destinations(&self) -> AppResult<Vec<ChannelDestination>> {
        sqlx::query_as::<_, ChannelDestination>(
            "SELECT d.* FROM channel_destinations d \
             JOIN pods p ON p.id = d.pod_id \
             WHERE d.is_active = TRUE AND p.is_active = TRUE",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to fetch destinations", e)
        })
    }
}
