pub mod admission;
pub mod inquiry;
pub mod notification;

pub use admission::{AdmissionRepositoryTrait, PostgresAdmissionRepository as AdmissionRepository};
pub use inquiry::{InquiryRepositoryTrait, PostgresInquiryRepository as InquiryRepository};
pub use notification::{
    NotificationRepositoryTrait, PostgresNotificationRepository as NotificationRepository,
};
