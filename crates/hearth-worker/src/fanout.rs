//! Notification fan-out
//!
//! Called right after an inquiry is stored. It only enqueues jobs; delivery
//! happens on the worker pool. Enqueue failures are logged and swallowed, so the
//! caller's create has already succeeded regardless.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use hearth_core::models::{AdmissionInquiry, Inquiry, JobKind, NotificationPayload};
use hearth_core::Config;

use crate::queue::JobQueue;

/// Payload of a `staff_email` job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    pub to: String,
    pub notification: NotificationPayload,
}

#[derive(Clone)]
pub struct NotificationFanout {
    queue: Arc<JobQueue>,
    staff_mailbox: Option<String>,
}

impl NotificationFanout {
    /// `staff_mailbox` enables the email sink.
    pub fn new(queue: Arc<JobQueue>, staff_mailbox: Option<String>) -> Self {
        Self {
            queue,
            staff_mailbox,
        }
    }

    pub fn from_config(queue: Arc<JobQueue>, config: &Config) -> Self {
        let mailbox = config
            .email_notifications_enabled()
            .then(|| config.staff_mailbox().map(str::to_string))
            .flatten();
        Self::new(queue, mailbox)
    }

    pub async fn dispatch_inquiry(&self, inquiry: &Inquiry) -> usize {
        self.dispatch(NotificationPayload::for_inquiry(inquiry)).await
    }

    pub async fn dispatch_admission(&self, admission: &AdmissionInquiry) -> usize {
        self.dispatch(NotificationPayload::for_admission(admission))
            .await
    }

    /// Enqueue the in-app job and, when configured, the email job. Returns how
    /// many jobs were enqueued.
    #[tracing::instrument(skip(self, payload), fields(notification.type = payload.type_name()))]
    pub async fn dispatch(&self, payload: NotificationPayload) -> usize {
        let mut jobs = Vec::with_capacity(2);
        match serde_json::to_value(&payload) {
            Ok(value) => jobs.push((JobKind::InAppNotification, value)),
            Err(e) => tracing::warn!(error = %e, "Failed to encode notification payload"),
        }
        if let Some(mailbox) = &self.staff_mailbox {
            let email = EmailJob {
                to: mailbox.clone(),
                notification: payload,
            };
            match serde_json::to_value(&email) {
                Ok(value) => jobs.push((JobKind::StaffEmail, value)),
                Err(e) => tracing::warn!(error = %e, "Failed to encode email job"),
            }
        }

        let mut enqueued = 0;
        for (kind, value) in jobs {
            match self.queue.submit(kind, value).await {
                Ok(_) => enqueued += 1,
                Err(e) => {
                    tracing::warn!(error = %e, job_kind = %kind, "Failed to enqueue notification job")
                }
            }
        }
        enqueued
    }
}
