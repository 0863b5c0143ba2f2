//! Hearth Database Layer
//!
//! Repository traits for every persisted entity, their PostgreSQL implementations,
//! and (behind the `memory` feature) an in-memory implementation used by tests.

pub mod db;
#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use db::{
    AdmissionRepository, AdmissionRepositoryTrait, BlogCategoryRepository,
    BlogCategoryRepositoryTrait, BlogPostRepository, BlogPostRepositoryTrait, InquiryRepository,
    InquiryRepositoryTrait, JobRepository, JobRepositoryTrait, NotificationRepository,
    NotificationRepositoryTrait, PublishedPostQuery, StaffRepository, StaffRepositoryTrait,
    TeamRepository, TeamRepositoryTrait, TestimonialRepository, TestimonialRepositoryTrait,
};
#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryDatabase;
