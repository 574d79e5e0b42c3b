//! Query service pagination and filter composition against a real catalog.

use std::sync::Arc;

use jobdeck_core::application::JobQueryService;
use jobdeck_core::domain::{Job, JobFilters, UserProfile};
use jobdeck_core::port::time_provider::FixedTimeProvider;
use jobdeck_core::port::JobCatalog;
use jobdeck_infra_sqlite::{create_pool, run_migrations, SqliteJobCatalog};

const NOW: i64 = 1_000_000;

async fn setup() -> (Arc<SqliteJobCatalog>, JobQueryService) {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let catalog = Arc::new(SqliteJobCatalog::new(pool, Arc::new(FixedTimeProvider(NOW))));
    let service = JobQueryService::new(catalog.clone());
    (catalog, service)
}

fn posting(id: &str, posted_at: i64) -> Job {
    Job {
        id: id.to_string(),
        employer: "Acme".to_string(),
        title: format!("Role {}", id),
        location: "Berlin".to_string(),
        remote: false,
        industry: Some("Software".to_string()),
        employment_type: Some("Full-time".to_string()),
        experience: None,
        education: None,
        salary_min: Some(40_000),
        salary_max: None,
        salary_currency: Some("EUR".to_string()),
        summary: "Work on things".to_string(),
        posted_at,
        valid_thru: None,
    }
}

#[tokio::test]
async fn page_length_and_has_more_hold_for_all_offsets() {
    let (catalog, service) = setup().await;
    for i in 0..25 {
        catalog
            .insert_job(&posting(&format!("job-{:02}", i), 1_000 + i))
            .await
            .unwrap();
    }

    let mut seen = 0usize;
    for offset in [0i64, 10, 20, 30] {
        let page = service
            .fetch_jobs(JobFilters::default(), Some(10), Some(offset))
            .await
            .unwrap();

        assert!(page.jobs.len() <= 10);
        assert_eq!(page.total_count, 25);
        assert_eq!(
            page.has_more,
            (offset + page.jobs.len() as i64) < page.total_count
        );
        seen += page.jobs.len();
    }
    assert_eq!(seen, 25);
}

#[tokio::test]
async fn degenerate_limits_are_clamped_not_rejected() {
    let (catalog, service) = setup().await;
    for i in 0..3 {
        catalog
            .insert_job(&posting(&format!("job-{}", i), 1_000 + i))
            .await
            .unwrap();
    }

    // limit=0 and negative limits clamp to 1
    let page = service
        .fetch_jobs(JobFilters::default(), Some(0), None)
        .await
        .unwrap();
    assert_eq!(page.jobs.len(), 1);
    assert!(page.has_more);

    let page = service
        .fetch_jobs(JobFilters::default(), Some(-20), None)
        .await
        .unwrap();
    assert_eq!(page.jobs.len(), 1);
}

#[tokio::test]
async fn filters_compose_with_and() {
    let (catalog, service) = setup().await;

    catalog.insert_job(&posting("plain", 1_000)).await.unwrap();

    let mut match_all = posting("match", 2_000);
    match_all.location = "Hamburg".to_string();
    match_all.salary_min = Some(90_000);
    catalog.insert_job(&match_all).await.unwrap();

    let mut wrong_salary = posting("cheap", 3_000);
    wrong_salary.location = "Hamburg".to_string();
    catalog.insert_job(&wrong_salary).await.unwrap();

    let filters = JobFilters {
        location: Some("Hamburg".to_string()),
        salary_floor: Some(80_000),
        ..JobFilters::default()
    };
    let page = service.fetch_jobs(filters, None, None).await.unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.jobs[0].id, "match");
}

#[tokio::test]
async fn search_excludes_expired_postings() {
    let (catalog, service) = setup().await;

    let mut lapsed = posting("lapsed", 2_000);
    lapsed.title = "Rust Engineer".to_string();
    lapsed.valid_thru = Some(NOW - 1);
    catalog.insert_job(&lapsed).await.unwrap();

    let mut live = posting("live", 1_000);
    live.title = "Rust Developer".to_string();
    catalog.insert_job(&live).await.unwrap();

    let page = service
        .search_jobs("Rust", JobFilters::default(), None, None)
        .await
        .unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.jobs[0].id, "live");
}

#[tokio::test]
async fn recommendations_follow_the_profile_scope() {
    let (catalog, service) = setup().await;

    let mut de = posting("de", 3_000);
    de.location = "Munich, Germany".to_string();
    catalog.insert_job(&de).await.unwrap();

    let mut us = posting("us", 2_000);
    us.location = "Austin, USA".to_string();
    catalog.insert_job(&us).await.unwrap();

    let mut remote = posting("rm", 1_000);
    remote.remote = true;
    remote.location = "Anywhere".to_string();
    catalog.insert_job(&remote).await.unwrap();

    let mut profile = UserProfile::new("user-1");
    profile.target_countries = vec!["Germany".to_string()];

    let jobs = service.recommended_jobs(&profile, 20).await.unwrap();
    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["de", "rm"]);

    // The profile's own location widens the scope
    profile.location = Some("Austin".to_string());
    let jobs = service.recommended_jobs(&profile, 20).await.unwrap();
    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["de", "us", "rm"]);

    // An empty scope falls back to the whole catalog
    let bare = UserProfile::new("user-2");
    let jobs = service.recommended_jobs(&bare, 20).await.unwrap();
    assert_eq!(jobs.len(), 3);
}
