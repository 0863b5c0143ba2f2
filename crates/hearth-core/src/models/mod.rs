//! Data models
//!
//! One sub-module per domain entity. Everything is re-exported here.

mod admission;
mod blog;
mod choice;
mod inquiry;
mod job;
mod notification;
mod pagination;
mod staff;
mod status;
mod team;
mod testimonial;

pub use admission::*;
pub use blog::*;
pub use choice::*;
pub use inquiry::*;
pub use job::*;
pub use notification::*;
pub use pagination::*;
pub use staff::*;
pub use status::*;
pub use team::*;
pub use testimonial::*;
