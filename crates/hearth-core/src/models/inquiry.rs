use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

use super::choice::ContactMethod;
use super::status::{stamp_once, StatusLifecycle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "inquiry_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    Read,
    Replied,
    Closed,
}

impl StatusLifecycle for InquiryStatus {
    const ALL: &'static [Self] = &[
        InquiryStatus::New,
        InquiryStatus::Read,
        InquiryStatus::Replied,
        InquiryStatus::Closed,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Read => "read",
            InquiryStatus::Replied => "replied",
            InquiryStatus::Closed => "closed",
        }
    }

    fn timestamp_column(&self) -> Option<&'static str> {
        match self {
            InquiryStatus::New => None,
            InquiryStatus::Read => Some("read_at"),
            InquiryStatus::Replied => Some("replied_at"),
            InquiryStatus::Closed => Some("closed_at"),
        }
    }
}

impl Display for InquiryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A message sent through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_contact: Option<ContactMethod>,
    pub message: String,
    pub status: InquiryStatus,
    pub read_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn from_new(id: Uuid, new: NewInquiry, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            preferred_contact: new.preferred_contact,
            message: new.message,
            status: InquiryStatus::New,
            read_at: None,
            replied_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `status`, stamping its timestamp only on first reach.
    pub fn apply_status(&mut self, status: InquiryStatus, now: DateTime<Utc>) {
        self.status = status;
        match status {
            InquiryStatus::New => {}
            InquiryStatus::Read => stamp_once(&mut self.read_at, now),
            InquiryStatus::Replied => stamp_once(&mut self.replied_at, now),
            InquiryStatus::Closed => stamp_once(&mut self.closed_at, now),
        }
        self.updated_at = now;
    }
}

/// Normalized contact-form submission, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_contact: Option<ContactMethod>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Inquiry {
        Inquiry::from_new(
            Uuid::new_v4(),
            NewInquiry {
                name: "Maria Reyes".to_string(),
                email: "maria@example.com".to_string(),
                phone: None,
                preferred_contact: None,
                message: "Tour request".to_string(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_new_inquiry_has_no_status_stamps() {
        let inquiry = sample();
        assert_eq!(inquiry.status, InquiryStatus::New);
        assert!(inquiry.read_at.is_none());
        assert!(inquiry.replied_at.is_none());
        assert!(inquiry.closed_at.is_none());
    }

    #[test]
    fn test_repeated_transition_keeps_first_stamp() {
        let mut inquiry = sample();
        let first = Utc::now();
        inquiry.apply_status(InquiryStatus::Read, first);
        inquiry.apply_status(InquiryStatus::Read, first + Duration::minutes(5));
        assert_eq!(inquiry.read_at, Some(first));
    }

    #[test]
    fn test_back_to_new_keeps_stamps() {
        let mut inquiry = sample();
        let now = Utc::now();
        inquiry.apply_status(InquiryStatus::Closed, now);
        inquiry.apply_status(InquiryStatus::New, now + Duration::minutes(1));
        assert_eq!(inquiry.status, InquiryStatus::New);
        assert_eq!(inquiry.closed_at, Some(now));
    }
}
