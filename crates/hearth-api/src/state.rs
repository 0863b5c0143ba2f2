//! Application state shared by every handler.
//!
//! Repositories are held as trait objects so the same router runs against
//! PostgreSQL in production and the in-memory store in tests.

use hearth_core::Config;
use hearth_db::{
    AdmissionRepositoryTrait, BlogCategoryRepositoryTrait, BlogPostRepositoryTrait,
    InquiryRepositoryTrait, NotificationRepositoryTrait, StaffRepositoryTrait,
    TeamRepositoryTrait, TestimonialRepositoryTrait,
};
use hearth_storage::{Storage, UploadValidator};
use hearth_worker::{JobQueue, NotificationFanout};
use sqlx::PgPool;
use std::sync::Arc;

/// Connection pool (absent when running on in-memory repositories) and every repository.
#[derive(Clone)]
pub struct DbState {
    pub pool: Option<PgPool>,
    pub inquiries: Arc<dyn InquiryRepositoryTrait>,
    pub admissions: Arc<dyn AdmissionRepositoryTrait>,
    pub notifications: Arc<dyn NotificationRepositoryTrait>,
    pub categories: Arc<dyn BlogCategoryRepositoryTrait>,
    pub posts: Arc<dyn BlogPostRepositoryTrait>,
    pub team: Arc<dyn TeamRepositoryTrait>,
    pub testimonials: Arc<dyn TestimonialRepositoryTrait>,
    pub staff: Arc<dyn StaffRepositoryTrait>,
}

impl DbState {
    /// Every repository backed by one store that implements them all.
    pub fn shared<R>(store: Arc<R>, pool: Option<PgPool>) -> Self
    where
        R: InquiryRepositoryTrait
            + AdmissionRepositoryTrait
            + NotificationRepositoryTrait
            + BlogCategoryRepositoryTrait
            + BlogPostRepositoryTrait
            + TeamRepositoryTrait
            + TestimonialRepositoryTrait
            + StaffRepositoryTrait
            + 'static,
    {
        Self {
            pool,
            inquiries: store.clone(),
            admissions: store.clone(),
            notifications: store.clone(),
            categories: store.clone(),
            posts: store.clone(),
            team: store.clone(),
            testimonials: store.clone(),
            staff: store,
        }
    }
}

/// Blob store and the upload rules applied before anything reaches it.
#[derive(Clone)]
pub struct MediaState {
    pub storage: Arc<dyn Storage>,
    pub validator: Arc<UploadValidator>,
}

impl MediaState {
    pub fn new(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self {
            storage,
            validator: Arc::new(UploadValidator::from_config(config)),
        }
    }

    /// Public URL for an optional stored path.
    pub fn url_of(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| self.storage.url(p))
    }
}

pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub media: MediaState,
    pub fanout: NotificationFanout,
    pub job_queue: Arc<JobQueue>,
}
