// Domain Layer - Pure business logic and entities

pub mod error;
pub mod interaction;
pub mod job;
pub mod profile;
pub mod query;

// Re-exports
pub use error::DomainError;
pub use interaction::{InteractionId, InteractionKind, UserJobInteraction};
pub use job::{Job, JobId, UserId};
pub use profile::UserProfile;
pub use query::{FilterOptions, JobFilters, JobPage, JobQuery, MAX_PAGE_SIZE};
