//! In-memory repositories
//!
//! [`MemoryDatabase`] implements every repository trait over plain vectors guarded
//! by a single lock. Rows are kept in insertion order, so "newest first" is a
//! reverse walk. It mirrors the PostgreSQL semantics the handlers rely on:
//! first-reach status stamps, published-only public queries, and due-time job claims.

mod content;
mod control;
mod intake;

use hearth_core::models::{
    AdmissionInquiry, BlogCategory, BlogPost, Inquiry, Job, Notification, StaffUser, TeamMember,
    Testimonial,
};
use tokio::sync::RwLock;

#[derive(Default)]
pub(crate) struct Tables {
    pub inquiries: Vec<Inquiry>,
    pub admissions: Vec<AdmissionInquiry>,
    pub notifications: Vec<Notification>,
    pub categories: Vec<BlogCategory>,
    pub posts: Vec<BlogPost>,
    pub team: Vec<TeamMember>,
    pub testimonials: Vec<Testimonial>,
    pub staff: Vec<StaffUser>,
    pub jobs: Vec<Job>,
}

#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every table.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

/// Remove the row matching `pred`. Returns whether one was removed.
pub(crate) fn remove_where<T>(rows: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = rows.len();
    rows.retain(|row| !pred(row));
    rows.len() != before
}
