// SQLite JobCatalog Implementation

use async_trait::async_trait;
use jobdeck_core::domain::{FilterOptions, Job, JobFilters, JobPage, JobQuery};
use jobdeck_core::error::Result;
use jobdeck_core::port::{JobCatalog, TimeProvider};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::interaction_store::map_sqlx_error;

pub struct SqliteJobCatalog {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteJobCatalog {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

/// AND-composition of the optional filter predicates.
///
/// Appended after an existing WHERE clause; every branch binds owned values so
/// the builder can outlive the filter borrow.
pub(crate) fn push_filter_predicates(qb: &mut QueryBuilder<'_, Sqlite>, filters: &JobFilters) {
    if let Some(location) = &filters.location {
        qb.push(" AND j.location LIKE ");
        qb.push_bind(format!("%{}%", location));
    }
    if let Some(remote) = filters.remote {
        qb.push(" AND j.remote = ");
        qb.push_bind(i64::from(remote));
    }
    if let Some(industry) = &filters.industry {
        qb.push(" AND j.industry = ");
        qb.push_bind(industry.clone());
    }
    if let Some(employment_type) = &filters.employment_type {
        qb.push(" AND j.employment_type = ");
        qb.push_bind(employment_type.clone());
    }
    if let Some(experience) = &filters.experience {
        qb.push(" AND j.experience = ");
        qb.push_bind(experience.clone());
    }
    if let Some(education) = &filters.education {
        qb.push(" AND j.education = ");
        qb.push_bind(education.clone());
    }
    if let Some(salary_floor) = filters.salary_floor {
        qb.push(" AND j.salary_min >= ");
        qb.push_bind(salary_floor);
    }
}

/// Everything a [`JobQuery`] contributes after the SELECT head: expiry
/// exclusion, filters, the OR'd search term and the profile scope.
fn push_query_predicates(qb: &mut QueryBuilder<'_, Sqlite>, query: &JobQuery, now: i64) {
    qb.push(" WHERE (j.valid_thru IS NULL OR j.valid_thru >= ");
    qb.push_bind(now);
    qb.push(")");

    push_filter_predicates(qb, &query.filters);

    if let Some(term) = &query.search_term {
        let pattern = format!("%{}%", term);
        qb.push(" AND (j.title LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR j.employer LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR j.summary LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(scope) = &query.scope {
        if !scope.is_empty() {
            qb.push(" AND (");
            let mut first = true;
            for region in &scope.regions {
                if !first {
                    qb.push(" OR ");
                }
                qb.push("j.location LIKE ");
                qb.push_bind(format!("%{}%", region));
                first = false;
            }
            for title in &scope.titles {
                if !first {
                    qb.push(" OR ");
                }
                qb.push("j.title LIKE ");
                qb.push_bind(format!("%{}%", title));
                first = false;
            }
            if scope.include_remote {
                qb.push(" OR j.remote = 1");
            }
            qb.push(")");
        }
    }
}

#[async_trait]
impl JobCatalog for SqliteJobCatalog {
    async fn fetch_page(&self, query: &JobQuery) -> Result<JobPage> {
        let now = self.time_provider.now_millis();

        // Total count under the same predicates as the page itself
        let mut count_qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM jobs j");
        push_query_predicates(&mut count_qb, query, now);

        let total_count: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut page_qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT j.* FROM jobs j");
        push_query_predicates(&mut page_qb, query, now);
        page_qb.push(" ORDER BY j.posted_at DESC LIMIT ");
        page_qb.push_bind(i64::from(query.limit));
        page_qb.push(" OFFSET ");
        page_qb.push_bind(i64::from(query.offset));

        let rows: Vec<JobRow> = page_qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let jobs: Vec<Job> = rows.into_iter().map(|r| r.into_job()).collect();

        tracing::debug!(
            returned = jobs.len(),
            total_count,
            offset = query.offset,
            "Fetched job page"
        );

        Ok(JobPage::new(jobs, total_count, query.offset))
    }

    async fn filter_options(&self) -> Result<FilterOptions> {
        async fn distinct(pool: &SqlitePool, column: &str) -> Result<Vec<String>> {
            // Column names come from the fixed list below, never from input
            let sql = format!(
                "SELECT DISTINCT {col} FROM jobs WHERE {col} IS NOT NULL ORDER BY {col}",
                col = column
            );
            sqlx::query_scalar(&sql)
                .fetch_all(pool)
                .await
                .map_err(map_sqlx_error)
        }

        Ok(FilterOptions {
            industries: distinct(&self.pool, "industry").await?,
            locations: distinct(&self.pool, "location").await?,
            employment_types: distinct(&self.pool, "employment_type").await?,
            experiences: distinct(&self.pool, "experience").await?,
            educations: distinct(&self.pool, "education").await?,
        })
    }

    async fn insert_job(&self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, employer, title, location, remote,
                industry, employment_type, experience, education,
                salary_min, salary_max, salary_currency,
                summary, posted_at, valid_thru
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.employer)
        .bind(&job.title)
        .bind(&job.location)
        .bind(i64::from(job.remote))
        .bind(&job.industry)
        .bind(&job.employment_type)
        .bind(&job.experience)
        .bind(&job.education)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.salary_currency)
        .bind(&job.summary)
        .bind(job.posted_at)
        .bind(job.valid_thru)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

/// SQLite row representation for postings
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct JobRow {
    id: String,
    employer: String,
    title: String,
    location: String,
    remote: i64, // SQLite boolean as integer
    industry: Option<String>,
    employment_type: Option<String>,
    experience: Option<String>,
    education: Option<String>,
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    salary_currency: Option<String>,
    summary: String,
    posted_at: i64,
    valid_thru: Option<i64>,
}

impl JobRow {
    pub(crate) fn into_job(self) -> Job {
        Job {
            id: self.id,
            employer: self.employer,
            title: self.title,
            location: self.location,
            remote: self.remote != 0,
            industry: self.industry,
            employment_type: self.employment_type,
            experience: self.experience,
            education: self.education,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            salary_currency: self.salary_currency,
            summary: self.summary,
            posted_at: self.posted_at,
            valid_thru: self.valid_thru,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use jobdeck_core::domain::query::ProfileScope;
    use jobdeck_core::port::time_provider::FixedTimeProvider;

    fn posting(id: &str, title: &str, location: &str, posted_at: i64) -> Job {
        Job {
            id: id.to_string(),
            employer: "Acme".to_string(),
            title: title.to_string(),
            location: location.to_string(),
            remote: false,
            industry: Some("Software".to_string()),
            employment_type: Some("Full-time".to_string()),
            experience: None,
            education: None,
            salary_min: Some(50_000),
            salary_max: None,
            salary_currency: Some("EUR".to_string()),
            summary: "Ship features".to_string(),
            posted_at,
            valid_thru: None,
        }
    }

    async fn setup() -> SqliteJobCatalog {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteJobCatalog::new(pool, Arc::new(FixedTimeProvider(10_000)))
    }

    #[tokio::test]
    async fn pages_are_ordered_newest_first() {
        let catalog = setup().await;
        catalog.insert_job(&posting("a", "Old", "Berlin", 1_000)).await.unwrap();
        catalog.insert_job(&posting("b", "New", "Berlin", 2_000)).await.unwrap();

        let query = JobQuery::normalized(JobFilters::default(), Some(10), None);
        let page = catalog.fetch_page(&query).await.unwrap();

        assert_eq!(page.total_count, 2);
        assert!(!page.has_more);
        assert_eq!(page.jobs[0].id, "b");
        assert_eq!(page.jobs[1].id, "a");
    }

    #[tokio::test]
    async fn expired_postings_never_appear() {
        let catalog = setup().await;
        let mut lapsed = posting("gone", "Lapsed", "Berlin", 1_000);
        lapsed.valid_thru = Some(9_999); // now is fixed at 10_000
        catalog.insert_job(&lapsed).await.unwrap();
        catalog.insert_job(&posting("live", "Live", "Berlin", 1_000)).await.unwrap();

        let query = JobQuery::normalized(JobFilters::default(), Some(10), None);
        let page = catalog.fetch_page(&query).await.unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.jobs[0].id, "live");
    }

    #[tokio::test]
    async fn search_matches_title_employer_or_summary() {
        let catalog = setup().await;
        catalog.insert_job(&posting("t", "Rust Engineer", "Berlin", 3_000)).await.unwrap();
        let mut by_employer = posting("e", "Backend Engineer", "Berlin", 2_000);
        by_employer.employer = "Rustacean GmbH".to_string();
        catalog.insert_job(&by_employer).await.unwrap();
        catalog.insert_job(&posting("x", "Accountant", "Berlin", 1_000)).await.unwrap();

        let query = JobQuery::normalized(JobFilters::default(), Some(10), None)
            .with_search_term("Rust");
        let page = catalog.fetch_page(&query).await.unwrap();

        assert_eq!(page.total_count, 2);
        let ids: Vec<&str> = page.jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["t", "e"]);
    }

    #[tokio::test]
    async fn scope_ors_regions_and_remote() {
        let catalog = setup().await;
        catalog.insert_job(&posting("de", "A", "Berlin, Germany", 3_000)).await.unwrap();
        catalog.insert_job(&posting("fr", "B", "Paris, France", 2_000)).await.unwrap();
        let mut remote = posting("rm", "C", "Anywhere", 1_000);
        remote.remote = true;
        catalog.insert_job(&remote).await.unwrap();

        let scope = ProfileScope {
            regions: vec!["Germany".to_string()],
            titles: Vec::new(),
            include_remote: true,
        };
        let query = JobQuery::normalized(JobFilters::default(), Some(10), None).with_scope(scope);
        let page = catalog.fetch_page(&query).await.unwrap();

        let ids: Vec<&str> = page.jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["de", "rm"]);
    }

    #[tokio::test]
    async fn scope_matches_requested_titles() {
        let catalog = setup().await;
        catalog.insert_job(&posting("r", "Rust Engineer", "Paris, France", 2_000)).await.unwrap();
        catalog.insert_job(&posting("a", "Accountant", "Paris, France", 1_000)).await.unwrap();

        let scope = ProfileScope {
            regions: Vec::new(),
            titles: vec!["Rust".to_string()],
            include_remote: false,
        };
        let query = JobQuery::normalized(JobFilters::default(), Some(10), None).with_scope(scope);
        let page = catalog.fetch_page(&query).await.unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.jobs[0].id, "r");
    }

    #[tokio::test]
    async fn facets_list_distinct_non_null_values() {
        let catalog = setup().await;
        catalog.insert_job(&posting("a", "A", "Berlin", 1_000)).await.unwrap();
        catalog.insert_job(&posting("b", "B", "Hamburg", 2_000)).await.unwrap();
        let mut bare = posting("c", "C", "Berlin", 3_000);
        bare.industry = None;
        catalog.insert_job(&bare).await.unwrap();

        let options = catalog.filter_options().await.unwrap();
        assert_eq!(options.industries, vec!["Software"]);
        assert_eq!(options.locations, vec!["Berlin", "Hamburg"]);
        assert_eq!(options.employment_types, vec!["Full-time"]);
        assert!(options.experiences.is_empty());
    }
}
