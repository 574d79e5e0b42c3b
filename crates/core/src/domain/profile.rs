// User Profile (consumed, not owned)

use crate::domain::job::UserId;
use serde::{Deserialize, Serialize};

/// Filtering inputs supplied by the profile/onboarding layer.
///
/// jobdeck only reads this; the profile itself is owned elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,

    /// Countries the user wants to work in (OR'd in recommendations).
    #[serde(default)]
    pub target_countries: Vec<String>,

    /// Free-text location from onboarding.
    pub location: Option<String>,

    /// Desired job titles previously extracted from the resume.
    #[serde(default)]
    pub title_requests: Vec<String>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            target_countries: Vec::new(),
            location: None,
            title_requests: Vec::new(),
        }
    }
}
