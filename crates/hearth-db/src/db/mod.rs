//! Database repositories
//!
//! Repositories are grouped into intake/ (inquiries, admission inquiries,
//! notifications), content/ (blog, team, testimonials) and control/ (staff, jobs).
//! Each one is a trait with a PostgreSQL implementation so handlers and workers
//! can run against the in-memory store in tests.
//
// Inquiry intake and staff notifications
pub mod intake;
//
// Public site content
pub mod content;
//
// Staff accounts and the job queue
pub mod control;

pub use content::{
    BlogCategoryRepository, BlogCategoryRepositoryTrait, BlogPostRepository,
    BlogPostRepositoryTrait, PublishedPostQuery, TeamRepository, TeamRepositoryTrait,
    TestimonialRepository, TestimonialRepositoryTrait,
};
pub use control::{JobRepository, JobRepositoryTrait, StaffRepository, StaffRepositoryTrait};
pub use intake::{
    AdmissionRepository, AdmissionRepositoryTrait, InquiryRepository, InquiryRepositoryTrait,
    NotificationRepository, NotificationRepositoryTrait,
};
