// Deck State - explicit state struct exposed to the UI layer

use crate::domain::{InteractionKind, Job, JobFilters};
use serde::Serialize;

/// Per-card transition phase.
///
/// A swipe does not assume success: the card goes Pending while the store
/// write is in flight and is reconciled to Committed or Failed when the
/// result resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CardPhase {
    /// Visible in the deck, no transition in flight.
    Ready,
    /// A kind transition has been requested but not yet confirmed.
    Pending(InteractionKind),
    /// The store confirmed the transition.
    Committed(InteractionKind),
    /// The store rejected the transition; the card stays visible.
    Failed(InteractionKind),
}

/// One job card in the deck.
#[derive(Debug, Clone, Serialize)]
pub struct DeckCard {
    pub job: Job,
    pub phase: CardPhase,
}

impl DeckCard {
    pub fn ready(job: Job) -> Self {
        Self {
            job,
            phase: CardPhase::Ready,
        }
    }
}

/// Reactive state fields exposed to the UI layer.
///
/// Mutated only through [`JobDeck`](super::JobDeck) methods; errors land in
/// `error` as a human-readable string, never as a panic or rethrow.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeckState {
    pub cards: Vec<DeckCard>,
    pub is_loading: bool,
    pub has_more: bool,
    pub error: Option<String>,
    pub total_count: i64,
    pub filters: JobFilters,
}

impl DeckState {
    /// Jobs currently visible, in deck order. Committed cards have already
    /// left the deck from the UI's perspective; they stay in `cards` only
    /// until the next load replaces the list.
    pub fn current_jobs(&self) -> Vec<&Job> {
        self.cards
            .iter()
            .filter(|c| !matches!(c.phase, CardPhase::Committed(_)))
            .map(|c| &c.job)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.current_jobs().is_empty()
    }
}
