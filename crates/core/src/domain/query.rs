// Job Query Domain Model - filters, pagination, result pages

use crate::domain::job::Job;
use crate::domain::profile::UserProfile;
use serde::{Deserialize, Serialize};

/// Hard cap on page size; larger requests are clamped, never rejected.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default deck/page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Optional predicates AND-composed into every catalog read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilters {
    /// Substring match on the location column.
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub industry: Option<String>,
    pub employment_type: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    /// Salary floor: matches postings whose salary_min is at least this.
    pub salary_floor: Option<i64>,
}

impl JobFilters {
    pub fn is_empty(&self) -> bool {
        *self == JobFilters::default()
    }
}

/// Profile-derived scope for recommendations: OR across the user's target
/// regions and requested titles, OR remote postings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileScope {
    /// Location substrings: target countries plus the user's own location.
    pub regions: Vec<String>,
    /// Title substrings from the roles the user asked for.
    pub titles: Vec<String>,
    pub include_remote: bool,
}

impl ProfileScope {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let mut regions = profile.target_countries.clone();
        if let Some(location) = &profile.location {
            regions.push(location.clone());
        }
        Self {
            regions,
            titles: profile.title_requests.clone(),
            include_remote: true,
        }
    }

    /// An empty scope means the profile constrains nothing; recommendations
    /// fall back to the base ordering.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.titles.is_empty()
    }
}

/// A normalized read against the job catalog.
///
/// Built through [`JobQuery::normalized`] so adapters never see a limit
/// outside [1, MAX_PAGE_SIZE] or a missing offset.
#[derive(Debug, Clone)]
pub struct JobQuery {
    pub filters: JobFilters,
    /// OR'd substring match across title/employer/summary.
    pub search_term: Option<String>,
    /// Profile-derived location scope (recommendations only).
    pub scope: Option<ProfileScope>,
    pub limit: u32,
    pub offset: u32,
}

impl JobQuery {
    /// Normalize raw pagination inputs: limit clamped into [1, MAX_PAGE_SIZE],
    /// offset defaulting to 0. Negative limits arrive as i64 from callers that
    /// forward unvalidated UI input.
    pub fn normalized(filters: JobFilters, limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64) as u32;
        let offset = offset.unwrap_or(0).max(0) as u32;
        Self {
            filters,
            search_term: None,
            scope: None,
            limit,
            offset,
        }
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_scope(mut self, scope: ProfileScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total_count: i64,
    pub has_more: bool,
}

impl JobPage {
    /// `has_more` is derived, never stored: offset + returned < total.
    pub fn new(jobs: Vec<Job>, total_count: i64, offset: u32) -> Self {
        let has_more = (offset as i64 + jobs.len() as i64) < total_count;
        Self {
            jobs,
            total_count,
            has_more,
        }
    }

    pub fn empty() -> Self {
        Self {
            jobs: Vec::new(),
            total_count: 0,
            has_more: false,
        }
    }
}

/// Distinct non-null facet values for populating filter UIs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub industries: Vec<String>,
    pub locations: Vec<String>,
    pub employment_types: Vec<String>,
    pub experiences: Vec<String>,
    pub educations: Vec<String>,
}
