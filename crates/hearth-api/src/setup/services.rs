//! Repositories, mailer and job queue wiring

use anyhow::{Context, Result};
use hearth_core::Config;
use hearth_db::{
    AdmissionRepository, BlogCategoryRepository, BlogPostRepository, InquiryRepository,
    JobRepository, NotificationRepository, StaffRepository, TeamRepository,
    TestimonialRepository,
};
use hearth_storage::Storage;
use hearth_worker::{
    JobHandlerContext, JobQueue, JobQueueConfig, Mailer, NotificationFanout, SmtpMailer,
    StaffNotifier,
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::state::{AppState, DbState, MediaState};

pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let db = DbState {
        pool: Some(pool.clone()),
        inquiries: Arc::new(InquiryRepository::new(pool.clone())),
        admissions: Arc::new(AdmissionRepository::new(pool.clone())),
        notifications: Arc::new(NotificationRepository::new(pool.clone())),
        categories: Arc::new(BlogCategoryRepository::new(pool.clone())),
        posts: Arc::new(BlogPostRepository::new(pool.clone())),
        team: Arc::new(TeamRepository::new(pool.clone())),
        testimonials: Arc::new(TestimonialRepository::new(pool.clone())),
        staff: Arc::new(StaffRepository::new(pool.clone())),
    };

    let mailer: Option<Arc<dyn Mailer>> = SmtpMailer::from_config(config)
        .context("Failed to configure SMTP mailer")?
        .map(|m| Arc::new(m) as Arc<dyn Mailer>);
    if mailer.is_none() {
        tracing::info!("Email delivery disabled; staff receive in-app notifications only");
    }

    let notifier: Arc<dyn JobHandlerContext> = Arc::new(StaffNotifier::new(
        db.staff.clone(),
        db.notifications.clone(),
        mailer,
        config,
    ));
    let queue_config = JobQueueConfig::from_config(config);
    tracing::info!(
        max_workers = queue_config.max_workers,
        poll_interval_ms = queue_config.poll_interval_ms,
        "Starting job queue"
    );
    let job_queue = Arc::new(JobQueue::new(
        Arc::new(JobRepository::new(pool)),
        queue_config,
        notifier,
    ));
    let fanout = NotificationFanout::from_config(job_queue.clone(), config);

    Ok(Arc::new(AppState {
        config: config.clone(),
        db,
        media: MediaState::new(storage, config),
        fanout,
        job_queue,
    }))
}
