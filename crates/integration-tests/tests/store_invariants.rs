//! Interaction store invariants: the at-most-one-row guarantee, queue
//! round-trips and availability exclusion.

use std::sync::Arc;

use jobdeck_core::domain::{InteractionKind, Job, JobFilters};
use jobdeck_core::error::AppError;
use jobdeck_core::port::id_provider::UuidProvider;
use jobdeck_core::port::time_provider::SystemTimeProvider;
use jobdeck_core::port::{InteractionStore, JobCatalog, UpsertOutcome};
use jobdeck_infra_sqlite::{
    create_pool, run_migrations, SqliteInteractionStore, SqliteJobCatalog,
};

async fn setup() -> (SqliteInteractionStore, SqliteJobCatalog) {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time_provider = Arc::new(SystemTimeProvider);
    let store = SqliteInteractionStore::new(
        pool.clone(),
        time_provider.clone(),
        Arc::new(UuidProvider),
    );
    let catalog = SqliteJobCatalog::new(pool, time_provider);
    (store, catalog)
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
        salary_min: Some(55_000),
        salary_max: Some(75_000),
        salary_currency: Some("EUR".to_string()),
        summary: "Do the work".to_string(),
        posted_at,
        valid_thru: None,
    }
}

#[tokio::test]
async fn queued_job_round_trips_exactly_once() {
    let (store, catalog) = setup().await;
    catalog.insert_job(&posting("job-1", 1_000)).await.unwrap();

    let user = "user-1".to_string();
    let queued = store
        .add_jobs_to_queue(&user, &["job-1".to_string()])
        .await
        .unwrap();
    assert_eq!(queued, 1);

    let jobs = store
        .jobs_with_interactions(&user, InteractionKind::Queued, 20)
        .await
        .unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, "job-1");

    let rows = store
        .interactions_by_kind(&user, InteractionKind::Queued, None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, InteractionKind::Queued);
}

#[tokio::test]
async fn double_apply_leaves_exactly_one_row() {
    let (store, catalog) = setup().await;
    catalog.insert_job(&posting("job-1", 1_000)).await.unwrap();

    let user = "user-1".to_string();
    let job = "job-1".to_string();

    store
        .add_jobs_to_queue(&user, &[job.clone()])
        .await
        .unwrap();

    // First call transitions the QUEUED row, second is a no-op update
    let first = store
        .upsert_interaction(&user, &job, InteractionKind::Applied)
        .await
        .unwrap();
    assert_eq!(first, UpsertOutcome::Updated);

    let second = store
        .upsert_interaction(&user, &job, InteractionKind::Applied)
        .await
        .unwrap();
    assert_eq!(second, UpsertOutcome::Updated);

    let applied = store
        .interactions_by_kind(&user, InteractionKind::Applied, None)
        .await
        .unwrap();
    assert_eq!(applied.len(), 1);

    // The row moved, it was not duplicated
    let queued = store
        .interactions_by_kind(&user, InteractionKind::Queued, None)
        .await
        .unwrap();
    assert!(queued.is_empty());
}

#[tokio::test]
async fn passed_job_cannot_be_reapplied() {
    let (store, catalog) = setup().await;
    catalog.insert_job(&posting("job-1", 1_000)).await.unwrap();

    let user = "user-1".to_string();
    let job = "job-1".to_string();

    store
        .upsert_interaction(&user, &job, InteractionKind::Passed)
        .await
        .unwrap();

    let err = store
        .upsert_interaction(&user, &job, InteractionKind::Applied)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));

    // The row is still PASSED and nothing leaked into APPLIED
    let passed = store
        .interactions_by_kind(&user, InteractionKind::Passed, None)
        .await
        .unwrap();
    assert_eq!(passed.len(), 1);
    let applied = store
        .interactions_by_kind(&user, InteractionKind::Applied, None)
        .await
        .unwrap();
    assert!(applied.is_empty());
}

#[tokio::test]
async fn available_jobs_never_include_interacted_ones() {
    let (store, catalog) = setup().await;
    for i in 0..5 {
        catalog
            .insert_job(&posting(&format!("job-{}", i), 1_000 + i))
            .await
            .unwrap();
    }

    let user = "user-1".to_string();
    store
        .upsert_interaction(&user, &"job-0".to_string(), InteractionKind::Applied)
        .await
        .unwrap();
    store
        .upsert_interaction(&user, &"job-1".to_string(), InteractionKind::Passed)
        .await
        .unwrap();
    store
        .add_jobs_to_queue(&user, &["job-2".to_string()])
        .await
        .unwrap();

    let available = store
        .available_jobs(&user, &JobFilters::default(), 20)
        .await
        .unwrap();

    let ids: Vec<&str> = available.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["job-4", "job-3"]);

    // A different user still sees everything
    let other = "user-2".to_string();
    let available = store
        .available_jobs(&other, &JobFilters::default(), 20)
        .await
        .unwrap();
    assert_eq!(available.len(), 5);
}

#[tokio::test]
async fn clearing_queued_rows_spares_other_kinds() {
    let (store, catalog) = setup().await;
    for i in 0..3 {
        catalog
            .insert_job(&posting(&format!("job-{}", i), 1_000))
            .await
            .unwrap();
    }

    let user = "user-1".to_string();
    store
        .add_jobs_to_queue(&user, &["job-0".to_string(), "job-1".to_string()])
        .await
        .unwrap();
    store
        .upsert_interaction(&user, &"job-2".to_string(), InteractionKind::Applied)
        .await
        .unwrap();

    let cleared = store
        .clear_interactions_by_kind(&user, InteractionKind::Queued)
        .await
        .unwrap();
    assert_eq!(cleared, 2);

    let applied = store
        .interactions_by_kind(&user, InteractionKind::Applied, None)
        .await
        .unwrap();
    assert_eq!(applied.len(), 1);
}

#[tokio::test]
async fn batch_queue_skips_ids_with_existing_rows() {
    let (store, catalog) = setup().await;
    for i in 0..3 {
        catalog
            .insert_job(&posting(&format!("job-{}", i), 1_000))
            .await
            .unwrap();
    }

    let user = "user-1".to_string();
    store
        .upsert_interaction(&user, &"job-1".to_string(), InteractionKind::Passed)
        .await
        .unwrap();

    let queued = store
        .add_jobs_to_queue(
            &user,
            &[
                "job-0".to_string(),
                "job-1".to_string(),
                "job-2".to_string(),
            ],
        )
        .await
        .unwrap();
    assert_eq!(queued, 2);

    // The passed row is untouched
    let passed = store
        .interactions_by_kind(&user, InteractionKind::Passed, None)
        .await
        .unwrap();
    assert_eq!(passed.len(), 1);
    assert_eq!(passed[0].job_id, "job-1");
}
