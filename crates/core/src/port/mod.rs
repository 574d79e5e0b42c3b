// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod interaction_store;
pub mod job_catalog;
pub mod maintenance;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use interaction_store::{InteractionStore, UpsertOutcome};
pub use job_catalog::JobCatalog;
pub use maintenance::{DeckMaintenance, MaintenanceConfig, MaintenanceStats};
pub use time_provider::TimeProvider;
