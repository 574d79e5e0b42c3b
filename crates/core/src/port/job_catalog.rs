// Job Catalog Port (Interface)

use crate::domain::{FilterOptions, Job, JobPage, JobQuery};
use crate::error::Result;
use async_trait::async_trait;

/// Paginated, ordered reads against the job catalog.
///
/// Queries are pre-normalized by the application layer ([`JobQuery`] carries a
/// clamped limit); adapters only translate predicates. Expired postings are
/// excluded from every read and ordering is always posted_at descending.
#[async_trait]
pub trait JobCatalog: Send + Sync {
    /// One page of postings matching the query, with the total match count.
    async fn fetch_page(&self, query: &JobQuery) -> Result<JobPage>;

    /// Distinct non-null values per facet column.
    async fn filter_options(&self) -> Result<FilterOptions>;

    /// Write path for the ingestion side (seeding, tests).
    /// The client-facing pipeline never calls this.
    async fn insert_job(&self, job: &Job) -> Result<()>;
}
