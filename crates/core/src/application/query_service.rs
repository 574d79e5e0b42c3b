// Job Query Service - normalizes reads against the catalog

use crate::domain::query::ProfileScope;
use crate::domain::{FilterOptions, Job, JobFilters, JobPage, JobQuery, UserProfile};
use crate::error::Result;
use crate::port::JobCatalog;
use std::sync::Arc;
use tracing::debug;

/// Translates a filter set into a normalized, paginated catalog read.
///
/// All clamping happens here: the catalog port never sees a limit outside
/// [1, 100] or a negative offset. Expiry exclusion and posted_at-descending
/// ordering are the adapter's contract (see [`JobCatalog`]).
pub struct JobQueryService {
    catalog: Arc<dyn JobCatalog>,
}

impl JobQueryService {
    pub fn new(catalog: Arc<dyn JobCatalog>) -> Self {
        Self { catalog }
    }

    /// AND-composition of the optional filter predicates, paginated.
    pub async fn fetch_jobs(
        &self,
        filters: JobFilters,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<JobPage> {
        let query = JobQuery::normalized(filters, limit, offset);
        debug!(limit = query.limit, offset = query.offset, "Fetching jobs");
        self.catalog.fetch_page(&query).await
    }

    /// Same as [`fetch_jobs`](Self::fetch_jobs) plus an OR'd substring match
    /// across title/employer/summary. A blank term degrades to a plain fetch.
    pub async fn search_jobs(
        &self,
        term: &str,
        filters: JobFilters,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<JobPage> {
        let mut query = JobQuery::normalized(filters, limit, offset);
        let term = term.trim();
        if !term.is_empty() {
            query = query.with_search_term(term);
        }
        debug!(term = %term, limit = query.limit, "Searching jobs");
        self.catalog.fetch_page(&query).await
    }

    /// Profile-derived recommendations: OR across target countries, OR remote,
    /// on top of the base ordering. An empty profile scope falls back to the
    /// plain newest-posted-first listing.
    pub async fn recommended_jobs(&self, profile: &UserProfile, limit: i64) -> Result<Vec<Job>> {
        let mut query = JobQuery::normalized(JobFilters::default(), Some(limit), None);
        let scope = ProfileScope::from_profile(profile);
        if !scope.is_empty() {
            query = query.with_scope(scope);
        }
        let page = self.catalog.fetch_page(&query).await?;
        Ok(page.jobs)
    }

    /// Distinct facet values for the filter UI.
    pub async fn filter_options(&self) -> Result<FilterOptions> {
        self.catalog.filter_options().await
    }
}
