// SQLite Maintenance Implementation

use async_trait::async_trait;
use jobdeck_core::domain::InteractionKind;
use jobdeck_core::error::{AppError, Result};
use jobdeck_core::port::{DeckMaintenance, MaintenanceStats, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// Housekeeping over the local store: expiry sweep, interaction GC, VACUUM.
pub struct SqliteDeckMaintenance {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteDeckMaintenance {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }

    /// Get DB file size in MB via page accounting
    async fn get_db_size(&self) -> Result<f64> {
        let page_count: i64 = sqlx::query_scalar("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get page count: {}", e)))?;

        let page_size: i64 = sqlx::query_scalar("PRAGMA page_size")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get page size: {}", e)))?;

        let size_bytes = page_count * page_size;
        Ok(size_bytes as f64 / (1024.0 * 1024.0))
    }
}

#[async_trait]
impl DeckMaintenance for SqliteDeckMaintenance {
    async fn expire_stale_queued(&self) -> Result<u64> {
        let now = self.time_provider.now_millis();

        let result = sqlx::query(
            r#"
            UPDATE user_job_interactions
            SET kind = ?, updated_at = ?
            WHERE kind = ?
              AND job_id IN (
                  SELECT id FROM jobs
                  WHERE valid_thru IS NOT NULL AND valid_thru < ?
              )
            "#,
        )
        .bind(InteractionKind::Expired.to_string())
        .bind(now)
        .bind(InteractionKind::Queued.to_string())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Expiry sweep failed: {}", e)))?;

        let expired = result.rows_affected();
        info!(expired_interactions = expired, "Expiry sweep completed");
        Ok(expired)
    }

    async fn gc_interactions(&self, retention_days: i64) -> Result<u64> {
        let now = self.time_provider.now_millis();
        let retention_ms = retention_days * 24 * 60 * 60 * 1000;
        let cutoff_time = now - retention_ms;

        info!(
            retention_days = retention_days,
            cutoff_time = cutoff_time,
            "Running interaction GC"
        );

        // Only PASSED and EXPIRED rows are reclaimable; APPLIED rows are the
        // user's application history and are kept indefinitely
        let result = sqlx::query(
            r#"
            DELETE FROM user_job_interactions
            WHERE kind IN (?, ?)
              AND updated_at < ?
            "#,
        )
        .bind(InteractionKind::Passed.to_string())
        .bind(InteractionKind::Expired.to_string())
        .bind(cutoff_time)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Interaction GC failed: {}", e)))?;

        let deleted = result.rows_affected();
        info!(deleted_interactions = deleted, "Interaction GC completed");
        Ok(deleted)
    }

    async fn vacuum(&self) -> Result<f64> {
        info!("Running VACUUM to optimize database...");

        let size_before = self.get_db_size().await?;

        sqlx::query("VACUUM")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("VACUUM failed: {}", e)))?;

        let size_after = self.get_db_size().await?;
        let reclaimed = (size_before - size_after).max(0.0);

        info!(
            size_before_mb = size_before,
            size_after_mb = size_after,
            reclaimed_mb = reclaimed,
            "VACUUM completed"
        );

        Ok(reclaimed)
    }

    async fn stats(&self) -> Result<MaintenanceStats> {
        let db_size_mb = self.get_db_size().await?;

        let job_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to count jobs: {}", e)))?;

        let interaction_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_job_interactions")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to count interactions: {}", e)))?;

        let expired_interaction_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_job_interactions WHERE kind = ?")
                .bind(InteractionKind::Expired.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to count expired: {}", e)))?;

        Ok(MaintenanceStats {
            db_size_mb,
            job_count,
            interaction_count,
            expired_interaction_count,
        })
    }
}
