use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use hearth_core::models::{Job, JobStatus, NewJob, NewStaffUser, StaffUser};
use hearth_core::AppError;
use uuid::Uuid;

use super::MemoryDatabase;
use crate::db::control::job::STALE_JOB_ERROR;
use crate::db::{JobRepositoryTrait, StaffRepositoryTrait};

#[async_trait::async_trait]
impl StaffRepositoryTrait for MemoryDatabase {
    async fn create(&self, new: NewStaffUser) -> Result<StaffUser, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .staff
            .iter()
            .any(|s| s.email.eq_ignore_ascii_case(&new.email))
        {
            return Err(AppError::field("email", "The email has already been taken."));
        }
        let now = Utc::now();
        let staff = StaffUser {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            avatar: None,
            api_token_hash: new.api_token_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.staff.push(staff.clone());
        Ok(staff)
    }

    async fn get(&self, id: Uuid) -> Result<Option<StaffUser>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.staff.iter().find(|s| s.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<StaffUser>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .staff
            .iter()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<StaffUser>, AppError> {
        let tables = self.tables.read().await;
        let mut staff: Vec<StaffUser> = tables.staff.iter().filter(|s| s.is_active).cloned().collect();
        staff.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(staff)
    }

    async fn update_avatar(
        &self,
        id: Uuid,
        avatar: Option<String>,
    ) -> Result<Option<StaffUser>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(staff) = tables.staff.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        staff.avatar = avatar;
        staff.updated_at = Utc::now();
        Ok(Some(staff.clone()))
    }

    async fn set_api_token_hash(&self, id: Uuid, hash: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let Some(staff) = tables.staff.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        staff.api_token_hash = Some(hash.to_string());
        staff.updated_at = Utc::now();
        Ok(true)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let Some(staff) = tables.staff.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        staff.is_active = is_active;
        staff.updated_at = Utc::now();
        Ok(true)
    }
}

impl MemoryDatabase {
    async fn update_job(&self, id: Uuid, change: impl FnOnce(&mut Job)) -> Result<Job> {
        let mut tables = self.tables.write().await;
        let job = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| anyhow!("Job {} not found", id))?;
        change(job);
        job.updated_at = Utc::now();
        Ok(job.clone())
    }
}

#[async_trait::async_trait]
impl JobRepositoryTrait for MemoryDatabase {
    async fn create(&self, new: NewJob) -> Result<Job> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            kind: new.kind,
            payload: new.payload,
            status: JobStatus::Pending,
            retry_count: 0,
            max_retries: new.max_retries,
            timeout_seconds: new.timeout_seconds,
            scheduled_at: now,
            started_at: None,
            completed_at: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.jobs.push(job.clone());
        Ok(job)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list(&self, status: Option<JobStatus>, limit: i64) -> Result<Vec<Job>> {
        let tables = self.tables.read().await;
        Ok(tables
            .jobs
            .iter()
            .rev()
            .filter(|j| status.map_or(true, |s| j.status == s))
            .take(limit.clamp(1, 1000) as usize)
            .cloned()
            .collect())
    }

    async fn claim_next(&self) -> Result<Option<Job>> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let next = tables
            .jobs
            .iter_mut()
            .filter(|j| {
                matches!(j.status, JobStatus::Pending | JobStatus::Scheduled)
                    && j.scheduled_at <= now
            })
            .min_by_key(|j| j.scheduled_at);
        let Some(job) = next else {
            return Ok(None);
        };
        job.status = JobStatus::Running;
        job.started_at = Some(now);
        job.updated_at = now;
        Ok(Some(job.clone()))
    }

    async fn mark_completed(&self, id: Uuid) -> Result<Job> {
        self.update_job(id, |job| {
            job.status = JobStatus::Completed;
            job.completed_at = Some(Utc::now());
        })
        .await
    }

    async fn schedule_retry(&self, id: Uuid, retry_at: DateTime<Utc>, error: &str) -> Result<Job> {
        self.update_job(id, |job| {
            job.status = JobStatus::Scheduled;
            job.retry_count += 1;
            job.scheduled_at = retry_at;
            job.last_error = Some(error.to_string());
        })
        .await
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<Job> {
        self.update_job(id, |job| {
            job.status = JobStatus::Failed;
            job.completed_at = Some(Utc::now());
            job.last_error = Some(error.to_string());
        })
        .await
    }

    async fn reap_stale_running(&self, grace_period_secs: i64) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut reaped = 0;
        for job in tables.jobs.iter_mut().filter(|j| j.status == JobStatus::Running) {
            let Some(started_at) = job.started_at else {
                continue;
            };
            let deadline = started_at
                + chrono::Duration::seconds(i64::from(job.timeout_seconds) + grace_period_secs);
            if deadline >= now {
                continue;
            }
            if job.retry_count < job.max_retries {
                job.status = JobStatus::Scheduled;
                job.retry_count += 1;
            } else {
                job.status = JobStatus::Failed;
                job.completed_at = Some(now);
            }
            job.scheduled_at = now;
            job.last_error = Some(STALE_JOB_ERROR.to_string());
            job.updated_at = now;
            reaped += 1;
        }
        Ok(reaped)
    }
}
