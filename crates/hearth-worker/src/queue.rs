//! Job queue: worker pool, polling, timeout, retry with backoff, and submission.
//!
//! Shutdown: [`JobQueue::shutdown`] tells the pool to stop claiming and waits for
//! jobs already running. Jobs left `running` by a process that died are requeued by
//! the stale job reaper once their timeout plus a grace period has passed.

use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use uuid::Uuid;

use hearth_core::models::{Job, JobKind, NewJob};
use hearth_core::Config;
use hearth_db::JobRepositoryTrait;

use crate::context::JobHandlerContext;

/// Upper bound for the delay between two attempts of the same job.
pub const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(300);

/// `min_backoff * 2^retry_count`, capped at [`MAX_RETRY_BACKOFF`].
pub(crate) fn compute_retry_backoff(min_backoff: Duration, retry_count: i32) -> Duration {
    let factor = 2_u32.saturating_pow(retry_count.max(0) as u32);
    min_backoff.saturating_mul(factor).min(MAX_RETRY_BACKOFF)
}

#[derive(Debug, Clone)]
pub struct JobQueueConfig {
    pub max_workers: usize,
    pub poll_interval_ms: u64,
    pub default_timeout_seconds: i32,
    pub max_retries: i32,
    pub min_backoff_ms: u64,
    /// Seconds between reaper runs. Zero disables the reaper.
    pub stale_job_reap_interval_secs: u64,
    /// Added to a job's own timeout before a `running` job counts as abandoned.
    pub stale_job_grace_period_secs: i64,
}

impl Default for JobQueueConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            poll_interval_ms: 1000,
            default_timeout_seconds: 60,
            max_retries: 3,
            min_backoff_ms: 1000,
            stale_job_reap_interval_secs: 60,
            stale_job_grace_period_secs: 300,
        }
    }
}

impl JobQueueConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_workers: config.job_queue_max_workers().max(1),
            poll_interval_ms: config.job_queue_poll_interval_ms(),
            default_timeout_seconds: config.job_queue_timeout_seconds(),
            max_retries: config.job_queue_max_retries(),
            ..Self::default()
        }
    }

    fn min_backoff(&self) -> Duration {
        Duration::from_millis(self.min_backoff_ms)
    }
}

#[derive(Clone)]
pub struct JobQueue {
    repository: Arc<dyn JobRepositoryTrait>,
    config: JobQueueConfig,
    shutdown_tx: mpsc::Sender<()>,
    pool_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl JobQueue {
    /// Create the queue and spawn its worker pool.
    pub fn new(
        repository: Arc<dyn JobRepositoryTrait>,
        config: JobQueueConfig,
        context: Arc<dyn JobHandlerContext>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let repo_clone = repository.clone();
        let config_clone = config.clone();
        let handle = tokio::spawn(async move {
            Self::worker_pool(repo_clone, config_clone, context, shutdown_rx).await;
        });

        Self {
            repository,
            config,
            shutdown_tx,
            pool_handle: Arc::new(Mutex::new(Some(handle))),
        }
    }

    /// Queue that only writes jobs. Nothing is processed unless a caller drives
    /// [`JobQueue::process_next`] itself, as the CLI and tests do.
    pub fn new_no_worker(repository: Arc<dyn JobRepositoryTrait>, config: JobQueueConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        drop(shutdown_rx);
        Self {
            repository,
            config,
            shutdown_tx,
            pool_handle: Arc::new(Mutex::new(None)),
        }
    }

    #[tracing::instrument(skip(self, payload), fields(job.kind = %kind))]
    pub async fn submit(&self, kind: JobKind, payload: serde_json::Value) -> Result<Uuid> {
        let job = self
            .repository
            .create(NewJob {
                kind,
                payload,
                max_retries: self.config.max_retries,
                timeout_seconds: self.config.default_timeout_seconds,
            })
            .await
            .context("Failed to create job")?;

        tracing::info!(job_id = %job.id, job_kind = %kind, "Job submitted to queue");
        Ok(job.id)
    }

    /// Claim one due job and run it to its next resting state on the current task.
    /// Returns `None` when nothing is due.
    pub async fn process_next(&self, context: Arc<dyn JobHandlerContext>) -> Result<Option<Job>> {
        let Some(job) = self.repository.claim_next().await? else {
            return Ok(None);
        };
        let job =
            Self::process_job_with_retry(job, self.repository.clone(), context, self.config.min_backoff())
                .await?;
        Ok(Some(job))
    }

    /// Process due jobs until none are left. Returns how many attempts ran.
    pub async fn drain(&self, context: Arc<dyn JobHandlerContext>) -> Result<usize> {
        let mut attempts = 0;
        while self.process_next(context.clone()).await?.is_some() {
            attempts += 1;
        }
        Ok(attempts)
    }

    async fn worker_pool(
        repository: Arc<dyn JobRepositoryTrait>,
        config: JobQueueConfig,
        context: Arc<dyn JobHandlerContext>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!(
            max_workers = config.max_workers,
            poll_interval_ms = config.poll_interval_ms,
            "Job queue worker pool started"
        );

        let semaphore = Arc::new(Semaphore::new(config.max_workers));
        let poll_interval = Duration::from_millis(config.poll_interval_ms);
        let min_backoff = config.min_backoff();

        let (reaper_shutdown_tx, mut reaper_shutdown_rx) = mpsc::channel::<()>(1);
        if config.stale_job_reap_interval_secs > 0 {
            let repo_for_reaper = repository.clone();
            let reap_interval = Duration::from_secs(config.stale_job_reap_interval_secs);
            let grace_period = config.stale_job_grace_period_secs;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(reap_interval);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            if let Err(e) = repo_for_reaper.reap_stale_running(grace_period).await {
                                tracing::error!(error = %e, "Stale job reaper failed");
                            }
                        }
                        _ = reaper_shutdown_rx.recv() => break,
                    }
                }
            });
        }

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Job queue worker pool shutting down");
                    let _ = reaper_shutdown_tx.send(()).await;
                    break;
                }
                _ = sleep(poll_interval) => {
                    Self::claim_and_dispatch(&repository, &semaphore, &context, min_backoff).await;
                }
            }
        }

        // Every permit back means every spawned job has reached a resting state.
        let in_flight = config.max_workers - semaphore.available_permits();
        if in_flight > 0 {
            tracing::info!(in_flight, "Waiting for running jobs to finish");
        }
        let _ = semaphore.acquire_many(config.max_workers as u32).await;

        tracing::info!("Job queue worker pool stopped");
    }

    /// Claim due jobs while a worker permit is free, spawning one task per job.
    /// Returns how many jobs were dispatched.
    async fn claim_and_dispatch(
        repository: &Arc<dyn JobRepositoryTrait>,
        semaphore: &Arc<Semaphore>,
        context: &Arc<dyn JobHandlerContext>,
        min_backoff: Duration,
    ) -> usize {
        let mut dispatched = 0;
        loop {
            let permit = match semaphore.clone().try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::debug!("No workers available, skipping claim");
                    break;
                }
            };

            match repository.claim_next().await {
                Ok(Some(job)) => {
                    let repo = repository.clone();
                    let ctx = context.clone();
                    tokio::spawn(async move {
                        let _permit = permit;
                        if let Err(e) = Self::process_job_with_retry(job, repo, ctx, min_backoff).await {
                            tracing::error!(error = %e, "Failed to record job outcome");
                        }
                    });
                    dispatched += 1;
                }
                Ok(None) => {
                    tracing::trace!("No jobs due");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to claim job from queue");
                    break;
                }
            }
        }
        dispatched
    }

    #[tracing::instrument(skip(job, repository, context), fields(job.id = %job.id, job.kind = %job.kind))]
    async fn process_job_with_retry(
        job: Job,
        repository: Arc<dyn JobRepositoryTrait>,
        context: Arc<dyn JobHandlerContext>,
        min_backoff: Duration,
    ) -> Result<Job> {
        let timeout = Duration::from_secs(job.timeout_seconds.max(1) as u64);
        let error = match tokio::time::timeout(timeout, context.dispatch_job(&job)).await {
            Ok(Ok(result)) => {
                let done = repository
                    .mark_completed(job.id)
                    .await
                    .context("Failed to mark job as completed")?;
                tracing::info!(job_id = %job.id, result = %result, "Job completed");
                return Ok(done);
            }
            Ok(Err(e)) => format!("{:#}", e),
            Err(_) => format!("Job timed out after {}s", timeout.as_secs()),
        };

        if job.can_retry() {
            let backoff = compute_retry_backoff(min_backoff, job.retry_count);
            let retry_at = Utc::now()
                + chrono::Duration::from_std(backoff).unwrap_or_else(|_| chrono::Duration::zero());
            tracing::warn!(
                job_id = %job.id,
                error = %error,
                retry_count = job.retry_count + 1,
                max_retries = job.max_retries,
                backoff_ms = backoff.as_millis() as u64,
                "Job failed, scheduling retry"
            );
            repository
                .schedule_retry(job.id, retry_at, &error)
                .await
                .context("Failed to schedule job retry")
        } else {
            tracing::error!(
                job_id = %job.id,
                error = %error,
                retry_count = job.retry_count,
                "Job failed after max retries"
            );
            repository
                .mark_failed(job.id, &error)
                .await
                .context("Failed to mark job as failed")
        }
    }

    /// Stop claiming and wait until running jobs have recorded their outcome.
    pub async fn shutdown(&self) {
        tracing::info!("Initiating job queue shutdown");
        let _ = self.shutdown_tx.send(()).await;
        if let Some(handle) = self.pool_handle.lock().await.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Job queue worker pool panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hearth_core::models::JobStatus;
    use hearth_db::MemoryDatabase;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyContext {
        failures_left: AtomicUsize,
    }

    #[async_trait]
    impl JobHandlerContext for FlakyContext {
        async fn dispatch_job(self: Arc<Self>, _job: &Job) -> Result<serde_json::Value> {
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                anyhow::bail!("transient failure");
            }
            Ok(serde_json::json!({ "ok": true }))
        }
    }

    fn test_queue(max_retries: i32) -> JobQueue {
        let db: Arc<dyn JobRepositoryTrait> = Arc::new(MemoryDatabase::new());
        JobQueue::new_no_worker(
            db,
            JobQueueConfig {
                max_retries,
                min_backoff_ms: 0,
                ..JobQueueConfig::default()
            },
        )
    }

    fn flaky(failures: usize) -> Arc<dyn JobHandlerContext> {
        Arc::new(FlakyContext {
            failures_left: AtomicUsize::new(failures),
        })
    }

    #[test]
    fn retry_backoff_exponential_then_capped() {
        let min = Duration::from_secs(1);
        assert_eq!(compute_retry_backoff(min, 0), Duration::from_secs(1));
        assert_eq!(compute_retry_backoff(min, 1), Duration::from_secs(2));
        assert_eq!(compute_retry_backoff(min, 8), Duration::from_secs(256));
        assert_eq!(compute_retry_backoff(min, 9), MAX_RETRY_BACKOFF);
        assert_eq!(compute_retry_backoff(min, 40), MAX_RETRY_BACKOFF);
        assert_eq!(compute_retry_backoff(Duration::ZERO, 3), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_failed_job_is_retried_then_completed() {
        let queue = test_queue(3);
        let ctx = flaky(1);
        let id = queue
            .submit(JobKind::StaffEmail, serde_json::json!({}))
            .await
            .unwrap();

        let first = queue.process_next(ctx.clone()).await.unwrap().unwrap();
        assert_eq!(first.id, id);
        assert_eq!(first.status, JobStatus::Scheduled);
        assert_eq!(first.last_error.as_deref(), Some("transient failure"));

        let second = queue.process_next(ctx.clone()).await.unwrap().unwrap();
        assert_eq!(second.status, JobStatus::Completed);
        assert_eq!(second.retry_count, 1);

        assert!(queue.process_next(ctx).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_job_fails_after_max_retries() {
        let queue = test_queue(2);
        let ctx = flaky(10);
        queue
            .submit(JobKind::InAppNotification, serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(queue.drain(ctx).await.unwrap(), 3);
        let jobs = queue.repository.list(Some(JobStatus::Failed), 10).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].retry_count, 2);
        assert!(jobs[0].last_error.is_some());
    }

    struct SlowContext {
        delay: Duration,
    }

    #[async_trait]
    impl JobHandlerContext for SlowContext {
        async fn dispatch_job(self: Arc<Self>, _job: &Job) -> Result<serde_json::Value> {
            sleep(self.delay).await;
            Ok(serde_json::json!({ "ok": true }))
        }
    }

    async fn wait_for_status(
        repo: &Arc<dyn JobRepositoryTrait>,
        id: Uuid,
        status: JobStatus,
    ) -> Job {
        for _ in 0..200 {
            let job = repo.get(id).await.unwrap().unwrap();
            if job.status == status {
                return job;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("job {} never reached {:?}", id, status);
    }

    #[tokio::test]
    async fn test_abandoned_running_job_is_redelivered() {
        let queue = test_queue(3);
        let id = queue
            .submit(JobKind::StaffEmail, serde_json::json!({}))
            .await
            .unwrap();

        // A worker claims the job and dies before recording an outcome.
        queue.repository.claim_next().await.unwrap().unwrap();
        assert_eq!(queue.drain(flaky(0)).await.unwrap(), 0);

        assert_eq!(queue.repository.reap_stale_running(-120).await.unwrap(), 1);
        assert_eq!(queue.drain(flaky(0)).await.unwrap(), 1);

        let job = queue.repository.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.retry_count, 1);
    }

    #[tokio::test]
    async fn test_worker_pool_reaper_requeues_stale_job() {
        let repo: Arc<dyn JobRepositoryTrait> = Arc::new(MemoryDatabase::new());
        let writer = JobQueue::new_no_worker(repo.clone(), JobQueueConfig::default());
        let id = writer
            .submit(JobKind::InAppNotification, serde_json::json!({}))
            .await
            .unwrap();
        repo.claim_next().await.unwrap().unwrap();

        let queue = JobQueue::new(
            repo.clone(),
            JobQueueConfig {
                poll_interval_ms: 10,
                stale_job_reap_interval_secs: 1,
                stale_job_grace_period_secs: -120,
                ..JobQueueConfig::default()
            },
            flaky(0),
        );

        let job = wait_for_status(&repo, id, JobStatus::Completed).await;
        assert_eq!(job.retry_count, 1);
        queue.shutdown().await;
    }

    #[tokio::test]
    async fn test_claim_dispatches_up_to_free_workers() {
        let repo: Arc<dyn JobRepositoryTrait> = Arc::new(MemoryDatabase::new());
        let queue = JobQueue::new_no_worker(repo.clone(), JobQueueConfig::default());
        for _ in 0..3 {
            queue
                .submit(JobKind::StaffEmail, serde_json::json!({}))
                .await
                .unwrap();
        }

        let semaphore = Arc::new(Semaphore::new(2));
        let ctx = flaky(0);
        let first = JobQueue::claim_and_dispatch(&repo, &semaphore, &ctx, Duration::ZERO).await;
        assert_eq!(first, 2);

        drop(semaphore.acquire_many(2).await.unwrap());
        let second = JobQueue::claim_and_dispatch(&repo, &semaphore, &ctx, Duration::ZERO).await;
        assert_eq!(second, 1);

        drop(semaphore.acquire_many(2).await.unwrap());
        let completed = repo.list(Some(JobStatus::Completed), 10).await.unwrap();
        assert_eq!(completed.len(), 3);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_running_jobs() {
        let repo: Arc<dyn JobRepositoryTrait> = Arc::new(MemoryDatabase::new());
        let ctx: Arc<dyn JobHandlerContext> = Arc::new(SlowContext {
            delay: Duration::from_millis(200),
        });
        let queue = JobQueue::new(
            repo.clone(),
            JobQueueConfig {
                poll_interval_ms: 10,
                ..JobQueueConfig::default()
            },
            ctx,
        );
        let id = queue
            .submit(JobKind::StaffEmail, serde_json::json!({}))
            .await
            .unwrap();

        wait_for_status(&repo, id, JobStatus::Running).await;
        queue.shutdown().await;

        let job = repo.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
    }
}
