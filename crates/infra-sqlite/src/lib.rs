// jobdeck Infrastructure - SQLite Adapter
// Implements: InteractionStore, JobCatalog, DeckMaintenance

mod connection;
mod interaction_store;
mod job_catalog;
mod maintenance_impl;
mod migration;

pub use connection::create_pool;
pub use interaction_store::SqliteInteractionStore;
pub use job_catalog::SqliteJobCatalog;
pub use maintenance_impl::SqliteDeckMaintenance;
pub use migration::run_migrations;

// Note: sqlx::Error conversion is handled by a mapping helper here
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError)
