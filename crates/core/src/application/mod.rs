// Application Layer - Use Cases and Business Logic

pub mod deck;
pub mod maintenance;
pub mod query_service;

// Re-exports
pub use deck::{CardPhase, DeckCard, DeckState, JobDeck};
pub use maintenance::MaintenanceRunner;
pub use query_service::JobQueryService;
