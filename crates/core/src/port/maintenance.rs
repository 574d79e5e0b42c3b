// Store Maintenance port
use crate::error::Result;
use async_trait::async_trait;

/// Maintenance statistics
#[derive(Debug, Clone)]
pub struct MaintenanceStats {
    pub db_size_mb: f64,
    pub job_count: i64,
    pub interaction_count: i64,
    pub expired_interaction_count: i64,
}

/// Maintenance configuration
#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    /// Retention period for terminal PASSED/EXPIRED rows (days)
    pub interaction_retention_days: i64,

    /// Maximum DB size before forcing VACUUM (MB)
    pub max_db_size_mb: f64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            interaction_retention_days: 30,
            max_db_size_mb: 500.0,
        }
    }
}

/// Housekeeping over the interaction store.
#[async_trait]
pub trait DeckMaintenance: Send + Sync {
    /// Mark QUEUED interactions whose posting has lapsed as EXPIRED.
    ///
    /// # Returns
    /// Number of interactions expired
    async fn expire_stale_queued(&self) -> Result<u64>;

    /// Delete terminal PASSED/EXPIRED rows older than the retention period.
    ///
    /// # Returns
    /// Number of rows deleted
    async fn gc_interactions(&self, retention_days: i64) -> Result<u64>;

    /// Run VACUUM to reclaim space.
    ///
    /// # Returns
    /// Space reclaimed in MB
    async fn vacuum(&self) -> Result<f64>;

    /// Get maintenance statistics
    async fn stats(&self) -> Result<MaintenanceStats>;

    /// Run full maintenance (sweep + GC + conditional VACUUM)
    async fn run_full_maintenance(&self, config: &MaintenanceConfig) -> Result<MaintenanceStats> {
        let stats_before = self.stats().await?;

        let expired = self.expire_stale_queued().await?;
        let deleted = self
            .gc_interactions(config.interaction_retention_days)
            .await?;

        let reclaimed_mb = if stats_before.db_size_mb > config.max_db_size_mb {
            self.vacuum().await?
        } else {
            0.0
        };

        let stats_after = self.stats().await?;

        tracing::info!(
            expired_interactions = expired,
            deleted_interactions = deleted,
            reclaimed_mb = reclaimed_mb,
            db_size_mb = stats_after.db_size_mb,
            "Maintenance completed"
        );

        Ok(stats_after)
    }
}
