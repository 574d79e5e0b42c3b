// Interaction Store Port (Interface)

use crate::domain::{InteractionKind, Job, JobFilters, JobId, UserId, UserJobInteraction};
use crate::error::Result;
use async_trait::async_trait;

/// What an upsert actually did.
///
/// "No existing row" is a normal, explicit outcome here - not something
/// callers infer from a store-specific error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row existed for (user, job); one was inserted.
    Inserted,
    /// An existing row had its kind transitioned in place.
    Updated,
}

/// Durable record of per-user, per-job interaction state.
///
/// Invariant: at most one row per (user, job), enforced by the backing store's
/// unique index and the atomic upsert - never by read-then-write in the caller.
/// Every operation surfaces store errors unmodified; there is no retry policy
/// at this layer.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Insert a new interaction row.
    ///
    /// A duplicate (user, job) pair fails with `AppError::Conflict`.
    async fn add_interaction(
        &self,
        user: &UserId,
        job: &JobId,
        kind: InteractionKind,
    ) -> Result<UserJobInteraction>;

    /// Bulk-insert one QUEUED row per id inside a single transaction.
    ///
    /// Ids that already have an interaction row are skipped. Returns the
    /// number of rows actually written; either the whole batch commits or the
    /// whole call fails.
    async fn add_jobs_to_queue(&self, user: &UserId, job_ids: &[JobId]) -> Result<u64>;

    /// Atomically set the kind for (user, job), inserting if no row exists.
    ///
    /// Kind changes the lifecycle forbids (see
    /// [`InteractionKind::can_transition_to`]) fail with `AppError::Domain`
    /// and leave the existing row untouched.
    async fn upsert_interaction(
        &self,
        user: &UserId,
        job: &JobId,
        kind: InteractionKind,
    ) -> Result<UpsertOutcome>;

    /// Interaction rows of one kind, newest-first.
    async fn interactions_by_kind(
        &self,
        user: &UserId,
        kind: InteractionKind,
        limit: Option<u32>,
    ) -> Result<Vec<UserJobInteraction>>;

    /// Join of interactions and jobs, newest interaction first, capped at `limit`.
    async fn jobs_with_interactions(
        &self,
        user: &UserId,
        kind: InteractionKind,
        limit: u32,
    ) -> Result<Vec<Job>>;

    /// Delete all rows of one kind for the user. Returns rows deleted.
    async fn clear_interactions_by_kind(&self, user: &UserId, kind: InteractionKind)
        -> Result<u64>;

    /// Jobs with no interaction row at all for this user, newest-posted-first,
    /// filtered and excluding expired postings.
    async fn available_jobs(
        &self,
        user: &UserId,
        filters: &JobFilters,
        limit: u32,
    ) -> Result<Vec<Job>>;
}
