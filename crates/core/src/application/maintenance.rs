// Maintenance Runner - manual trigger over the DeckMaintenance port

use crate::error::Result;
use crate::port::{DeckMaintenance, MaintenanceConfig, MaintenanceStats};
use std::sync::Arc;
use tracing::info;

/// Runs store housekeeping on demand.
///
/// jobdeck is client-driven, so maintenance fires when the host application
/// decides to (app start, pull-to-refresh, a CLI command) rather than on a
/// background schedule.
pub struct MaintenanceRunner {
    maintenance: Arc<dyn DeckMaintenance>,
    config: MaintenanceConfig,
}

impl MaintenanceRunner {
    pub fn new(maintenance: Arc<dyn DeckMaintenance>, config: MaintenanceConfig) -> Self {
        Self {
            maintenance,
            config,
        }
    }

    /// Run full maintenance immediately.
    pub async fn run_now(&self) -> Result<MaintenanceStats> {
        info!(
            retention_days = self.config.interaction_retention_days,
            "Running maintenance..."
        );

        let stats = self.maintenance.run_full_maintenance(&self.config).await?;

        info!(
            db_size_mb = stats.db_size_mb,
            job_count = stats.job_count,
            interaction_count = stats.interaction_count,
            "Maintenance completed"
        );

        Ok(stats)
    }
}
