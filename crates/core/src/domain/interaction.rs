// User/Job Interaction Domain Model

use crate::domain::job::{JobId, UserId};
use serde::{Deserialize, Serialize};

/// Interaction ID (UUID v4)
pub type InteractionId = String;

/// The user's current relationship to a job posting.
///
/// At most one interaction row exists per (user, job); the kind is mutated in
/// place as the user swipes or downstream processing reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionKind {
    Queued,
    Applied,
    Passed,
    ApplicationFailed,
    Expired,
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionKind::Queued => write!(f, "QUEUED"),
            InteractionKind::Applied => write!(f, "APPLIED"),
            InteractionKind::Passed => write!(f, "PASSED"),
            InteractionKind::ApplicationFailed => write!(f, "APPLICATION_FAILED"),
            InteractionKind::Expired => write!(f, "EXPIRED"),
        }
    }
}

impl std::str::FromStr for InteractionKind {
    type Err = crate::domain::error::DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "QUEUED" => Ok(InteractionKind::Queued),
            "APPLIED" => Ok(InteractionKind::Applied),
            "PASSED" => Ok(InteractionKind::Passed),
            "APPLICATION_FAILED" => Ok(InteractionKind::ApplicationFailed),
            "EXPIRED" => Ok(InteractionKind::Expired),
            other => Err(crate::domain::error::DomainError::ValidationError(format!(
                "Unknown interaction kind: {}",
                other
            ))),
        }
    }
}

impl InteractionKind {
    /// Every kind, for callers that derive per-target transition guards.
    pub const ALL: [InteractionKind; 5] = [
        InteractionKind::Queued,
        InteractionKind::Applied,
        InteractionKind::Passed,
        InteractionKind::ApplicationFailed,
        InteractionKind::Expired,
    ];

    /// Whether a kind change is a legal lifecycle step.
    ///
    /// QUEUED -> APPLIED | PASSED | EXPIRED
    /// APPLIED -> APPLICATION_FAILED
    /// Re-asserting the current kind is allowed (idempotent upserts).
    pub fn can_transition_to(self, to: InteractionKind) -> bool {
        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (
                InteractionKind::Queued,
                InteractionKind::Applied | InteractionKind::Passed | InteractionKind::Expired
            ) | (InteractionKind::Applied, InteractionKind::ApplicationFailed)
        )
    }

    /// Terminal from the swipe UI's perspective.
    pub fn is_terminal(self) -> bool {
        !matches!(self, InteractionKind::Queued)
    }
}

/// Interaction Entity
///
/// The one entity this layer truly owns: the relationship between one user and
/// one job at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserJobInteraction {
    pub id: InteractionId,
    pub user_id: UserId,
    pub job_id: JobId,
    pub kind: InteractionKind,
    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms
}

impl UserJobInteraction {
    /// Create a new interaction row.
    ///
    /// `id` and `created_at` are injected, not generated, so callers stay
    /// deterministic in tests (see the IdProvider/TimeProvider ports).
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        job_id: impl Into<String>,
        kind: InteractionKind,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            job_id: job_id.into(),
            kind,
            created_at,
            updated_at: created_at,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_can_become_applied_or_passed() {
        assert!(InteractionKind::Queued.can_transition_to(InteractionKind::Applied));
        assert!(InteractionKind::Queued.can_transition_to(InteractionKind::Passed));
        assert!(InteractionKind::Queued.can_transition_to(InteractionKind::Expired));
    }

    #[test]
    fn applied_can_only_fail() {
        assert!(InteractionKind::Applied.can_transition_to(InteractionKind::ApplicationFailed));
        assert!(!InteractionKind::Applied.can_transition_to(InteractionKind::Passed));
        assert!(!InteractionKind::Applied.can_transition_to(InteractionKind::Queued));
    }

    #[test]
    fn passed_is_terminal() {
        assert!(!InteractionKind::Passed.can_transition_to(InteractionKind::Applied));
        assert!(InteractionKind::Passed.is_terminal());
    }

    #[test]
    fn reasserting_same_kind_is_allowed() {
        assert!(InteractionKind::Applied.can_transition_to(InteractionKind::Applied));
    }

    #[test]
    fn new_row_starts_with_matching_timestamps() {
        let row =
            UserJobInteraction::new("i-1", "user-1", "job-1", InteractionKind::Queued, 1_000);
        assert_eq!(row.created_at, 1_000);
        assert_eq!(row.updated_at, 1_000);
    }

    #[test]
    fn kind_round_trips_through_display() {
        for kind in [
            InteractionKind::Queued,
            InteractionKind::Applied,
            InteractionKind::Passed,
            InteractionKind::ApplicationFailed,
            InteractionKind::Expired,
        ] {
            let parsed: InteractionKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }
}
