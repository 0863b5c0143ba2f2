use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use hearth_core::models::{Job, JobStatus, NewJob};

/// Durable job queue storage
#[async_trait::async_trait]
pub trait JobRepositoryTrait: Send + Sync {
    async fn create(&self, new: NewJob) -> Result<Job>;

    async fn get(&self, id: Uuid) -> Result<Option<Job>>;

    /// Newest first, optionally filtered by status.
    async fn list(&self, status: Option<JobStatus>, limit: i64) -> Result<Vec<Job>>;

    /// Atomically claim the next due job and mark it running.
    async fn claim_next(&self) -> Result<Option<Job>>;

    async fn mark_completed(&self, id: Uuid) -> Result<Job>;

    /// Put the job back in the queue for `retry_at`, counting the attempt.
    async fn schedule_retry(&self, id: Uuid, retry_at: DateTime<Utc>, error: &str) -> Result<Job>;

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<Job>;

    /// Requeue `running` jobs whose worker went away: anything started more than
    /// `timeout_seconds + grace_period_secs` ago. Jobs with no retries left fail.
    /// Returns how many rows were touched.
    async fn reap_stale_running(&self, grace_period_secs: i64) -> Result<u64>;
}

/// Recorded on a job that was found `running` past its deadline.
pub const STALE_JOB_ERROR: &str = "Worker stopped before the job finished";

#[derive(Clone)]
pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl JobRepositoryTrait for PostgresJobRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "jobs", db.operation = "insert", job.kind = %new.kind))]
    async fn create(&self, new: NewJob) -> Result<Job> {
        let job = sqlx::query_as::<Postgres, Job>(
            r#"
            INSERT INTO jobs (kind, payload, status, max_retries, timeout_seconds, scheduled_at)
            VALUES ($1, $2, 'pending', $3, $4, NOW())
            RETURNING id, kind, payload, status, retry_count, max_retries, timeout_seconds,
                      scheduled_at, started_at, completed_at, last_error, created_at, updated_at
            "#,
        )
        .bind(new.kind)
        .bind(&new.payload)
        .bind(new.max_retries)
        .bind(new.timeout_seconds)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, kind = %new.kind, "Failed to insert job into database");
            anyhow::anyhow!("Failed to insert job into database: {}", e)
        })?;

        tracing::debug!(job_id = %job.id, kind = %job.kind, "Job enqueued");
        Ok(job)
    }

    #[tracing::instrument(skip(self), fields(db.table = "jobs", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<Option<Job>> {
        let job = sqlx::query_as::<Postgres, Job>(
            r#"
            SELECT id, kind, payload, status, retry_count, max_retries, timeout_seconds,
                   scheduled_at, started_at, completed_at, last_error, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch job")?;

        Ok(job)
    }

    #[tracing::instrument(skip(self), fields(db.table = "jobs", db.operation = "select"))]
    async fn list(&self, status: Option<JobStatus>, limit: i64) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<Postgres, Job>(
            r#"
            SELECT id, kind, payload, status, retry_count, max_retries, timeout_seconds,
                   scheduled_at, started_at, completed_at, last_error, created_at, updated_at
            FROM jobs
            WHERE ($1::job_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(status)
        .bind(limit.clamp(1, 1000))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list jobs")?;

        Ok(jobs)
    }

    /// Uses `FOR UPDATE SKIP LOCKED` so concurrent workers never claim the same row.
    #[tracing::instrument(skip(self), fields(db.table = "jobs", db.operation = "claim"))]
    async fn claim_next(&self) -> Result<Option<Job>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let next: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM jobs
            WHERE status IN ('pending', 'scheduled')
                AND scheduled_at <= NOW()
            ORDER BY scheduled_at ASC
            LIMIT 1
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch next job")?;

        let Some(id) = next else {
            tx.rollback().await.ok();
            return Ok(None);
        };

        let job = sqlx::query_as::<Postgres, Job>(
            r#"
            UPDATE jobs
            SET status = 'running',
                started_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, kind, payload, status, retry_count, max_retries, timeout_seconds,
                      scheduled_at, started_at, completed_at, last_error, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update job status")?;

        tx.commit().await.context("Failed to commit transaction")?;

        tracing::debug!(job_id = %job.id, kind = %job.kind, "Job claimed");
        Ok(Some(job))
    }

    #[tracing::instrument(skip(self), fields(db.table = "jobs", db.operation = "update"))]
    async fn mark_completed(&self, id: Uuid) -> Result<Job> {
        let job = sqlx::query_as::<Postgres, Job>(
            r#"
            UPDATE jobs
            SET status = 'completed',
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, kind, payload, status, retry_count, max_retries, timeout_seconds,
                      scheduled_at, started_at, completed_at, last_error, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to mark job completed")?;

        Ok(job)
    }

    #[tracing::instrument(skip(self, error), fields(db.table = "jobs", db.operation = "update"))]
    async fn schedule_retry(&self, id: Uuid, retry_at: DateTime<Utc>, error: &str) -> Result<Job> {
        let job = sqlx::query_as::<Postgres, Job>(
            r#"
            UPDATE jobs
            SET status = 'scheduled',
                retry_count = retry_count + 1,
                scheduled_at = $2,
                last_error = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, kind, payload, status, retry_count, max_retries, timeout_seconds,
                      scheduled_at, started_at, completed_at, last_error, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(retry_at)
        .bind(error)
        .fetch_one(&self.pool)
        .await
        .context("Failed to schedule job retry")?;

        Ok(job)
    }

    #[tracing::instrument(skip(self, error), fields(db.table = "jobs", db.operation = "update"))]
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<Job> {
        let job = sqlx::query_as::<Postgres, Job>(
            r#"
            UPDATE jobs
            SET status = 'failed',
                completed_at = NOW(),
                last_error = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, kind, payload, status, retry_count, max_retries, timeout_seconds,
                      scheduled_at, started_at, completed_at, last_error, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(error)
        .fetch_one(&self.pool)
        .await
        .context("Failed to mark job failed")?;

        Ok(job)
    }

    #[tracing::instrument(skip(self), fields(db.table = "jobs", db.operation = "update"))]
    async fn reap_stale_running(&self, grace_period_secs: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = CASE WHEN retry_count < max_retries
                              THEN 'scheduled'::job_status
                              ELSE 'failed'::job_status END,
                retry_count = CASE WHEN retry_count < max_retries
                                   THEN retry_count + 1
                                   ELSE retry_count END,
                completed_at = CASE WHEN retry_count < max_retries
                                    THEN NULL
                                    ELSE NOW() END,
                scheduled_at = NOW(),
                last_error = $2,
                updated_at = NOW()
            WHERE status = 'running'
                AND started_at + (timeout_seconds + $1) * INTERVAL '1 second' < NOW()
            "#,
        )
        .bind(grace_period_secs)
        .bind(STALE_JOB_ERROR)
        .execute(&self.pool)
        .await
        .context("Failed to reap stale running jobs")?;

        let reaped = result.rows_affected();
        if reaped > 0 {
            tracing::warn!(count = reaped, "Requeued stale running jobs");
        }
        Ok(reaped)
    }
}
