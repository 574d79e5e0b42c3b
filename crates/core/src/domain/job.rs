// Job Posting Domain Model

use serde::{Deserialize, Serialize};

/// Job ID (UUID v4)
pub type JobId = String;

/// User ID (UUID v4, owned by the auth layer)
pub type UserId = String;

/// Job posting as published by the ingestion side.
///
/// The client-facing pipeline treats this record as read-only: postings are
/// written by an external ingestion process and only queried here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub employer: String,
    pub title: String,
    pub location: String,
    pub remote: bool,

    pub industry: Option<String>,
    pub employment_type: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,

    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,

    pub summary: String,

    pub posted_at: i64, // epoch ms
    /// Expiry timestamp in epoch ms. `None` means the posting never expires.
    pub valid_thru: Option<i64>,
}

impl Job {
    /// True if the posting has lapsed at `now_millis`.
    ///
    /// A null expiry is treated as never-expiring.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        match self.valid_thru {
            Some(valid_thru) => valid_thru < now_millis,
            None => false,
        }
    }
}
