pub mod job;
pub mod staff;

pub use job::{JobRepositoryTrait, PostgresJobRepository as JobRepository};
pub use staff::{PostgresStaffRepository as StaffRepository, StaffRepositoryTrait};
