//! Hearth background work
//!
//! New inquiries are turned into durable jobs by [`NotificationFanout`]. A
//! [`JobQueue`] worker pool claims them and hands each one to a
//! [`JobHandlerContext`], which in production is the [`StaffNotifier`].

pub mod context;
pub mod fanout;
pub mod mailer;
pub mod notifier;
pub mod queue;
pub mod templates;

pub use context::JobHandlerContext;
pub use fanout::{EmailJob, NotificationFanout};
pub use mailer::{DeliveryError, Mailer, OutgoingEmail, RecordingMailer, SmtpMailer};
pub use notifier::StaffNotifier;
pub use queue::{JobQueue, JobQueueConfig};
