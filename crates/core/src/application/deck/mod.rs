// Deck Orchestrator - holds the current deck and mediates swipe transitions

pub mod state;

pub use state::{CardPhase, DeckCard, DeckState};

use crate::domain::{InteractionKind, Job, JobFilters, JobId, UserId, UserProfile};
use crate::error::AppError;
use crate::port::InteractionStore;
use std::sync::Arc;
use tracing::{info, warn};

/// How many cards a deck load pulls at once.
pub const DECK_PAGE_SIZE: u32 = 20;

/// Client-side orchestrator for one user's job deck.
///
/// Owns an explicit [`DeckState`] instead of ambient context: the UI layer
/// holds a `JobDeck`, calls its operations from the event loop, and re-renders
/// from `state()`. Every store failure is caught at this boundary and recorded
/// in `state.error`; nothing is rethrown into the UI. Calls are single-flight -
/// the `&mut self` receiver means the UI cannot overlap two operations on the
/// same deck.
pub struct JobDeck {
    store: Arc<dyn InteractionStore>,
    user: UserId,
    profile: Option<UserProfile>,
    state: DeckState,
}

impl JobDeck {
    pub fn new(store: Arc<dyn InteractionStore>, user: impl Into<String>) -> Self {
        Self {
            store,
            user: user.into(),
            profile: None,
            state: DeckState::default(),
        }
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn state(&self) -> &DeckState {
        &self.state
    }

    pub fn set_filters(&mut self, filters: JobFilters) {
        self.state.filters = filters;
    }

    /// Load up to [`DECK_PAGE_SIZE`] existing QUEUED rows joined with job data;
    /// they become the visible deck.
    pub async fn fetch_queued_jobs(&mut self) {
        self.begin();
        match self
            .store
            .jobs_with_interactions(&self.user, InteractionKind::Queued, DECK_PAGE_SIZE)
            .await
        {
            Ok(jobs) => {
                info!(user = %self.user, count = jobs.len(), "Loaded queued deck");
                // A full page means the queue probably holds more than one load
                self.state.has_more = jobs.len() == DECK_PAGE_SIZE as usize;
                self.state.total_count = jobs.len() as i64;
                self.state.cards = jobs.into_iter().map(DeckCard::ready).collect();
            }
            Err(e) => self.capture("Failed to load job queue", e),
        }
        self.state.is_loading = false;
    }

    /// When the user has no queue yet: pull up to [`DECK_PAGE_SIZE`] available
    /// (uninteracted) jobs, bulk-queue them, then reload the deck.
    pub async fn fetch_recommended_jobs(&mut self) {
        if self.profile.is_none() {
            warn!(user = %self.user, "No profile available; skipping recommendations");
            return;
        }
        self.begin();
        if let Err(e) = self.queue_available_batch().await {
            self.capture("Failed to fetch recommended jobs", e);
            self.state.is_loading = false;
            return;
        }
        self.state.is_loading = false;
        self.fetch_queued_jobs().await;
    }

    /// Swipe right: transition the interaction for one job to APPLIED.
    pub async fn mark_applied(&mut self, job_id: &JobId) {
        self.swipe(job_id, InteractionKind::Applied).await;
    }

    /// Swipe left: transition the interaction for one job to PASSED.
    pub async fn mark_passed(&mut self, job_id: &JobId) {
        self.swipe(job_id, InteractionKind::Passed).await;
    }

    /// Clear all QUEUED rows, fetch a fresh available batch under the current
    /// filters, re-queue it and reload. No available jobs leaves an empty deck
    /// with `has_more = false` - that is not an error.
    pub async fn refresh_queue(&mut self) {
        self.begin();
        let result = async {
            self.store
                .clear_interactions_by_kind(&self.user, InteractionKind::Queued)
                .await?;
            self.queue_available_batch().await
        }
        .await;

        match result {
            Ok(queued) if queued == 0 => {
                info!(user = %self.user, "No available jobs on refresh");
                self.state.cards.clear();
                self.state.has_more = false;
                self.state.total_count = 0;
                self.state.is_loading = false;
            }
            Ok(_) => {
                self.state.is_loading = false;
                self.fetch_queued_jobs().await;
            }
            Err(e) => {
                self.capture("Failed to refresh job queue", e);
                self.state.is_loading = false;
            }
        }
    }

    /// Pass-through: bulk-queue explicit job ids. Returns rows queued.
    pub async fn add_jobs_to_queue(&mut self, job_ids: &[JobId]) -> u64 {
        self.begin();
        let queued = match self.store.add_jobs_to_queue(&self.user, job_ids).await {
            Ok(n) => n,
            Err(e) => {
                self.capture("Failed to queue jobs", e);
                0
            }
        };
        self.state.is_loading = false;
        queued
    }

    /// Pass-through: drop every QUEUED row and empty the visible deck.
    pub async fn clear_queue(&mut self) {
        self.begin();
        match self
            .store
            .clear_interactions_by_kind(&self.user, InteractionKind::Queued)
            .await
        {
            Ok(cleared) => {
                info!(user = %self.user, cleared, "Cleared job queue");
                self.state.cards.clear();
                self.state.has_more = false;
                self.state.total_count = 0;
            }
            Err(e) => self.capture("Failed to clear job queue", e),
        }
        self.state.is_loading = false;
    }

    /// Jobs this user has applied to, newest first.
    pub async fn applied_jobs(&mut self) -> Vec<Job> {
        self.jobs_by_kind(InteractionKind::Applied).await
    }

    /// Jobs this user has passed on, newest first.
    pub async fn passed_jobs(&mut self) -> Vec<Job> {
        self.jobs_by_kind(InteractionKind::Passed).await
    }

    async fn jobs_by_kind(&mut self, kind: InteractionKind) -> Vec<Job> {
        match self
            .store
            .jobs_with_interactions(&self.user, kind, DECK_PAGE_SIZE)
            .await
        {
            Ok(jobs) => jobs,
            Err(e) => {
                self.capture("Failed to load interactions", e);
                Vec::new()
            }
        }
    }

    /// One swipe transition, reconciled per card:
    /// Pending while the write is in flight, then Committed (leaves the
    /// visible deck) or Failed (stays visible, error recorded).
    async fn swipe(&mut self, job_id: &JobId, kind: InteractionKind) {
        let Some(idx) = self.state.cards.iter().position(|c| c.job.id == *job_id) else {
            self.capture(
                "Swipe on unknown card",
                AppError::NotFound(format!("Job {} is not in the deck", job_id)),
            );
            return;
        };

        self.state.cards[idx].phase = CardPhase::Pending(kind);

        match self.store.upsert_interaction(&self.user, job_id, kind).await {
            Ok(outcome) => {
                info!(user = %self.user, job = %job_id, kind = %kind, ?outcome, "Swipe committed");
                self.state.cards[idx].phase = CardPhase::Committed(kind);
            }
            Err(e) => {
                self.state.cards[idx].phase = CardPhase::Failed(kind);
                self.capture("Failed to record swipe", e);
            }
        }
    }

    /// Fetch an available batch under the current filters and queue it.
    /// Returns the number of jobs queued.
    async fn queue_available_batch(&mut self) -> crate::error::Result<u64> {
        let filters = self.state.filters.clone();
        let jobs = self
            .store
            .available_jobs(&self.user, &filters, DECK_PAGE_SIZE)
            .await?;
        if jobs.is_empty() {
            return Ok(0);
        }
        let ids: Vec<JobId> = jobs.iter().map(|j| j.id.clone()).collect();
        self.store.add_jobs_to_queue(&self.user, &ids).await
    }

    fn begin(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
    }

    fn capture(&mut self, context: &str, err: AppError) {
        tracing::error!(user = %self.user, error = %err, "{}", context);
        self.state.error = Some(format!("{}: {}", context, err));
    }
}
