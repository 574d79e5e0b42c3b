// SQLite InteractionStore Implementation

use async_trait::async_trait;
use jobdeck_core::domain::{
    DomainError, InteractionKind, Job, JobFilters, JobId, UserId, UserJobInteraction,
};
use jobdeck_core::error::{AppError, Result};
use jobdeck_core::port::{IdProvider, InteractionStore, TimeProvider, UpsertOutcome};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::job_catalog::{push_filter_predicates, JobRow};

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => {
                        // UNIQUE constraint failed - a row already exists
                        AppError::Conflict(format!(
                            "Unique constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "787" | "3850" => {
                        // FOREIGN KEY constraint failed
                        AppError::Database(format!(
                            "Foreign key constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "5" => {
                        // SQLITE_BUSY - database is locked
                        AppError::Database(format!(
                            "Database locked (SQLITE_BUSY): {}",
                            db_err.message()
                        ))
                    }
                    "13" => {
                        // SQLITE_FULL - database or disk is full
                        AppError::Database(format!("Database full: {}", db_err.message()))
                    }
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

pub struct SqliteInteractionStore {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
}

impl SqliteInteractionStore {
    pub fn new(
        pool: SqlitePool,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
    ) -> Self {
        Self {
            pool,
            time_provider,
            id_provider,
        }
    }

    async fn current_kind(&self, user: &UserId, job: &JobId) -> Result<Option<String>> {
        sqlx::query_scalar(
            "SELECT kind FROM user_job_interactions WHERE user_id = ? AND job_id = ?",
        )
        .bind(user)
        .bind(job)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl InteractionStore for SqliteInteractionStore {
    async fn add_interaction(
        &self,
        user: &UserId,
        job: &JobId,
        kind: InteractionKind,
    ) -> Result<UserJobInteraction> {
        let row = UserJobInteraction::new(
            self.id_provider.generate_id(),
            user.clone(),
            job.clone(),
            kind,
            self.time_provider.now_millis(),
        );

        sqlx::query(
            r#"
            INSERT INTO user_job_interactions (id, user_id, job_id, kind, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.user_id)
        .bind(&row.job_id)
        .bind(row.kind.to_string())
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row)
    }

    async fn add_jobs_to_queue(&self, user: &UserId, job_ids: &[JobId]) -> Result<u64> {
        if job_ids.is_empty() {
            return Ok(0);
        }

        let now = self.time_provider.now_millis();
        let kind = InteractionKind::Queued.to_string();

        // One transaction for the whole batch: it commits or fails as a unit
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let mut queued = 0u64;
        for job_id in job_ids {
            let result = sqlx::query(
                r#"
                INSERT INTO user_job_interactions (id, user_id, job_id, kind, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT (user_id, job_id) DO NOTHING
                "#,
            )
            .bind(self.id_provider.generate_id())
            .bind(user)
            .bind(job_id)
            .bind(&kind)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

            queued += result.rows_affected();
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        tracing::debug!(user = %user, requested = job_ids.len(), queued, "Queued job batch");
        Ok(queued)
    }

    async fn upsert_interaction(
        &self,
        user: &UserId,
        job: &JobId,
        kind: InteractionKind,
    ) -> Result<UpsertOutcome> {
        let now = self.time_provider.now_millis();

        // Kinds the target may legally come from (includes the target itself,
        // so re-asserting a kind stays idempotent)
        let allowed: Vec<String> = InteractionKind::ALL
            .into_iter()
            .filter(|from| from.can_transition_to(kind))
            .map(|from| from.to_string())
            .collect();

        // Update-first, guarded by the lifecycle rules: the common path is
        // transitioning an existing QUEUED row
        let mut update: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE user_job_interactions SET kind = ");
        update.push_bind(kind.to_string());
        update.push(", updated_at = ");
        update.push_bind(now);
        update.push(" WHERE user_id = ");
        update.push_bind(user.clone());
        update.push(" AND job_id = ");
        update.push_bind(job.clone());
        update.push(" AND kind IN (");
        let mut froms = update.separated(", ");
        for from in &allowed {
            froms.push_bind(from.clone());
        }
        update.push(")");

        let updated = update
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        if updated.rows_affected() > 0 {
            return Ok(UpsertOutcome::Updated);
        }

        // Nothing matched: either no row exists, or one whose kind may not
        // become the target
        if let Some(current) = self.current_kind(user, job).await? {
            return Err(AppError::Domain(DomainError::InvalidKindTransition {
                from: current,
                to: kind.to_string(),
            }));
        }

        // No row existed. Insert, with a conflict arm covering a concurrent
        // insert that landed between the two statements; the arm carries the
        // same transition guard.
        let mut insert: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO user_job_interactions \
             (id, user_id, job_id, kind, created_at, updated_at) VALUES (",
        );
        let mut values = insert.separated(", ");
        values.push_bind(self.id_provider.generate_id());
        values.push_bind(user.clone());
        values.push_bind(job.clone());
        values.push_bind(kind.to_string());
        values.push_bind(now);
        values.push_bind(now);
        insert.push(
            ") ON CONFLICT (user_id, job_id) \
             DO UPDATE SET kind = excluded.kind, updated_at = excluded.updated_at \
             WHERE user_job_interactions.kind IN (",
        );
        let mut froms = insert.separated(", ");
        for from in &allowed {
            froms.push_bind(from.clone());
        }
        insert.push(")");

        let inserted = insert
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        if inserted.rows_affected() == 0 {
            let current = self
                .current_kind(user, job)
                .await?
                .unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(AppError::Domain(DomainError::InvalidKindTransition {
                from: current,
                to: kind.to_string(),
            }));
        }

        Ok(UpsertOutcome::Inserted)
    }

    async fn interactions_by_kind(
        &self,
        user: &UserId,
        kind: InteractionKind,
        limit: Option<u32>,
    ) -> Result<Vec<UserJobInteraction>> {
        // SQLite treats LIMIT -1 as "no limit"
        let limit = limit.map(i64::from).unwrap_or(-1);

        let rows: Vec<InteractionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, job_id, kind, created_at, updated_at
            FROM user_job_interactions
            WHERE user_id = ? AND kind = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user)
        .bind(kind.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_interaction()).collect())
    }

    async fn jobs_with_interactions(
        &self,
        user: &UserId,
        kind: InteractionKind,
        limit: u32,
    ) -> Result<Vec<Job>> {
        let rows: Vec<JobRow> = sqlx::query_as(
            r#"
            SELECT j.*
            FROM jobs j
            JOIN user_job_interactions i ON i.job_id = j.id
            WHERE i.user_id = ? AND i.kind = ?
            ORDER BY i.created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user)
        .bind(kind.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_job()).collect())
    }

    async fn clear_interactions_by_kind(
        &self,
        user: &UserId,
        kind: InteractionKind,
    ) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM user_job_interactions WHERE user_id = ? AND kind = ?",
        )
        .bind(user)
        .bind(kind.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        tracing::debug!(user = %user, kind = %kind, deleted = result.rows_affected(), "Cleared interactions");
        Ok(result.rows_affected())
    }

    async fn available_jobs(
        &self,
        user: &UserId,
        filters: &JobFilters,
        limit: u32,
    ) -> Result<Vec<Job>> {
        let now = self.time_provider.now_millis();

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT j.* FROM jobs j WHERE NOT EXISTS (\
             SELECT 1 FROM user_job_interactions i \
             WHERE i.user_id = ",
        );
        qb.push_bind(user.clone());
        qb.push(" AND i.job_id = j.id)");

        qb.push(" AND (j.valid_thru IS NULL OR j.valid_thru >= ");
        qb.push_bind(now);
        qb.push(")");

        push_filter_predicates(&mut qb, filters);

        qb.push(" ORDER BY j.posted_at DESC LIMIT ");
        qb.push_bind(i64::from(limit));

        let rows: Vec<JobRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_job()).collect())
    }
}

/// SQLite row representation for interactions
#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    id: String,
    user_id: String,
    job_id: String,
    kind: String,
    created_at: i64,
    updated_at: i64,
}

impl InteractionRow {
    fn into_interaction(self) -> UserJobInteraction {
        // Unknown kinds cannot round-trip back into the enum; treat them as
        // expired so they never re-enter a deck
        let kind = self.kind.parse().unwrap_or(InteractionKind::Expired);

        UserJobInteraction {
            id: self.id,
            user_id: self.user_id,
            job_id: self.job_id,
            kind,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
