//! Staff notifier: the job handler behind the queue.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use hearth_core::models::{Job, JobKind, NotificationPayload};
use hearth_core::Config;
use hearth_db::{NotificationRepositoryTrait, StaffRepositoryTrait};

use crate::context::JobHandlerContext;
use crate::fanout::EmailJob;
use crate::mailer::{DeliveryError, Mailer, OutgoingEmail};
use crate::templates::staff_email;

pub struct StaffNotifier {
    staff: Arc<dyn StaffRepositoryTrait>,
    notifications: Arc<dyn NotificationRepositoryTrait>,
    mailer: Option<Arc<dyn Mailer>>,
    app_name: String,
    app_url: String,
}

impl StaffNotifier {
    pub fn new(
        staff: Arc<dyn StaffRepositoryTrait>,
        notifications: Arc<dyn NotificationRepositoryTrait>,
        mailer: Option<Arc<dyn Mailer>>,
        config: &Config,
    ) -> Self {
        Self {
            staff,
            notifications,
            mailer,
            app_name: config.app_name().to_string(),
            app_url: config.app_url().to_string(),
        }
    }

    async fn notify_in_app(&self, payload: NotificationPayload) -> Result<serde_json::Value> {
        let recipients: Vec<_> = self
            .staff
            .list_active()
            .await
            .context("Failed to load active staff")?
            .into_iter()
            .map(|staff| staff.id)
            .collect();

        let created = self
            .notifications
            .create_for_recipients(&payload, &recipients)
            .await
            .context("Failed to store notifications")?;

        tracing::info!(
            notification_type = payload.type_name(),
            recipients = created.len(),
            "In-app notifications created"
        );
        Ok(json!({ "recipients": created.len() }))
    }

    async fn send_email(&self, job: EmailJob) -> Result<serde_json::Value> {
        let mailer = self.mailer.as_ref().ok_or(DeliveryError::NotConfigured)?;
        let content = staff_email(&job.notification, &self.app_name, &self.app_url);
        let email = OutgoingEmail {
            to: job.to,
            subject: content.subject,
            body: content.body,
        };
        mailer.send(&email).await?;
        Ok(json!({ "to": email.to, "subject": email.subject }))
    }
}

#[async_trait]
impl JobHandlerContext for StaffNotifier {
    async fn dispatch_job(self: Arc<Self>, job: &Job) -> Result<serde_json::Value> {
        match job.kind {
            JobKind::InAppNotification => {
                let payload: NotificationPayload = serde_json::from_value(job.payload.clone())
                    .context("Invalid in-app notification payload")?;
                self.notify_in_app(payload).await
            }
            JobKind::StaffEmail => {
                let email: EmailJob = serde_json::from_value(job.payload.clone())
                    .context("Invalid staff email payload")?;
                self.send_email(email).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fanout::NotificationFanout;
    use crate::mailer::RecordingMailer;
    use crate::queue::{JobQueue, JobQueueConfig};
    use hearth_core::models::{JobStatus, NewInquiry, NewStaffUser, PageRequest};
    use hearth_core::SiteConfig;
    use hearth_db::{InquiryRepositoryTrait, MemoryDatabase};
    use uuid::Uuid;

    fn config() -> Config {
        Config::from(SiteConfig::default())
    }

    struct Harness {
        db: Arc<MemoryDatabase>,
        queue: JobQueue,
        fanout: NotificationFanout,
        notifier: Arc<dyn JobHandlerContext>,
        mailer: Arc<RecordingMailer>,
    }

    fn harness(mailer: RecordingMailer) -> Harness {
        let db = Arc::new(MemoryDatabase::new());
        let mailer = Arc::new(mailer);
        let queue = JobQueue::new_no_worker(
            db.clone(),
            JobQueueConfig {
                min_backoff_ms: 0,
                ..JobQueueConfig::default()
            },
        );
        let fanout = NotificationFanout::new(
            Arc::new(queue.clone()),
            Some("staff@example.com".to_string()),
        );
        let notifier = Arc::new(StaffNotifier::new(
            db.clone(),
            db.clone(),
            Some(mailer.clone()),
            &config(),
        ));
        Harness {
            db,
            queue,
            fanout,
            notifier,
            mailer,
        }
    }

    async fn add_staff(db: &MemoryDatabase, email: &str) -> Uuid {
        StaffRepositoryTrait::create(
            db,
            NewStaffUser {
                name: email.to_string(),
                email: email.to_string(),
                api_token_hash: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn new_inquiry(db: &MemoryDatabase) -> hearth_core::models::Inquiry {
        InquiryRepositoryTrait::create(
            db,
            NewInquiry {
                name: "Maria Reyes".to_string(),
                email: "maria@example.com".to_string(),
                phone: None,
                preferred_contact: None,
                message: "Tour request".to_string(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_in_app_job_skips_inactive_staff() {
        let h = harness(RecordingMailer::new());
        let active = add_staff(&h.db, "alice@example.com").await;
        let inactive = add_staff(&h.db, "bob@example.com").await;
        StaffRepositoryTrait::set_active(&*h.db, inactive, false)
            .await
            .unwrap();

        let inquiry = new_inquiry(&h.db).await;
        assert_eq!(h.fanout.dispatch_inquiry(&inquiry).await, 2);
        h.queue.drain(h.notifier.clone()).await.unwrap();

        let notifications: &dyn NotificationRepositoryTrait = &*h.db;
        let alice = notifications
            .list_for_recipient(active, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(alice.total, 1);
        let payload = alice.data[0].payload().unwrap();
        assert_eq!(payload.headline(), "New contact inquiry from Maria Reyes");
        assert_eq!(notifications.unread_count(inactive).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_email_failure_is_retried_and_delivered() {
        let h = harness(RecordingMailer::failing(1));
        let inquiry = new_inquiry(&h.db).await;
        h.fanout.dispatch_inquiry(&inquiry).await;

        h.queue.drain(h.notifier.clone()).await.unwrap();

        let sent = h.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "staff@example.com");
        assert_eq!(sent[0].subject, "[Hearth] New contact inquiry from Maria Reyes");

        let jobs = hearth_db::JobRepositoryTrait::list(&*h.db, None, 10)
            .await
            .unwrap();
        let email_job = jobs.iter().find(|j| j.kind == JobKind::StaffEmail).unwrap();
        assert_eq!(email_job.status, JobStatus::Completed);
        assert_eq!(email_job.retry_count, 1);
    }

    #[tokio::test]
    async fn test_email_without_mailer_fails_job() {
        let db = Arc::new(MemoryDatabase::new());
        let notifier: Arc<dyn JobHandlerContext> =
            Arc::new(StaffNotifier::new(db.clone(), db.clone(), None, &config()));
        let queue = JobQueue::new_no_worker(
            db.clone(),
            JobQueueConfig {
                max_retries: 0,
                ..JobQueueConfig::default()
            },
        );
        let fanout =
            NotificationFanout::new(Arc::new(queue.clone()), Some("staff@example.com".into()));
        let inquiry = new_inquiry(&db).await;
        fanout.dispatch_inquiry(&inquiry).await;

        queue.drain(notifier).await.unwrap();
        let failed = hearth_db::JobRepositoryTrait::list(&*db, Some(JobStatus::Failed), 10)
            .await
            .unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(
            failed[0].last_error.as_deref(),
            Some("Email transport is not configured")
        );
    }
}
