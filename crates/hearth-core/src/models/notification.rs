//! Staff notifications
//!
//! A notification row stores a `type` discriminator and a JSON `data` blob. The
//! blob is a denormalized summary of the event, so rendering a notification list
//! never needs the source record, which may since have been deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::admission::AdmissionInquiry;
use super::inquiry::Inquiry;

pub const EXCERPT_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub recipient_id: Uuid,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Typed payload, or `None` for an unknown or malformed record.
    pub fn payload(&self) -> Option<NotificationPayload> {
        NotificationPayload::decode(&self.notification_type, &self.data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InquirySummary {
    pub inquiry_id: Uuid,
    pub name: String,
    pub email: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdmissionSummary {
    pub admission_inquiry_id: Uuid,
    pub name: String,
    pub resident_name: String,
    pub care_service: Option<String>,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NotificationPayload {
    NewInquiry(InquirySummary),
    NewAdmissionInquiry(AdmissionSummary),
}

/// Record a notification points back at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSource {
    Inquiry(Uuid),
    AdmissionInquiry(Uuid),
}

impl NotificationPayload {
    pub fn type_name(&self) -> &'static str {
        match self {
            NotificationPayload::NewInquiry(_) => "new_inquiry",
            NotificationPayload::NewAdmissionInquiry(_) => "new_admission_inquiry",
        }
    }

    /// The `data` half of the tagged form.
    pub fn data(&self) -> serde_json::Value {
        let value = match self {
            NotificationPayload::NewInquiry(summary) => serde_json::to_value(summary),
            NotificationPayload::NewAdmissionInquiry(summary) => serde_json::to_value(summary),
        };
        value.unwrap_or(serde_json::Value::Null)
    }

    pub fn decode(notification_type: &str, data: &serde_json::Value) -> Option<Self> {
        match notification_type {
            "new_inquiry" => serde_json::from_value(data.clone())
                .ok()
                .map(NotificationPayload::NewInquiry),
            "new_admission_inquiry" => serde_json::from_value(data.clone())
                .ok()
                .map(NotificationPayload::NewAdmissionInquiry),
            _ => None,
        }
    }

    pub fn source(&self) -> NotificationSource {
        match self {
            NotificationPayload::NewInquiry(s) => NotificationSource::Inquiry(s.inquiry_id),
            NotificationPayload::NewAdmissionInquiry(s) => {
                NotificationSource::AdmissionInquiry(s.admission_inquiry_id)
            }
        }
    }

    /// One-line headline used in lists and email subjects.
    pub fn headline(&self) -> String {
        match self {
            NotificationPayload::NewInquiry(s) => format!("New contact inquiry from {}", s.name),
            NotificationPayload::NewAdmissionInquiry(s) => {
                format!("New admission inquiry for {}", s.resident_name)
            }
        }
    }

    pub fn for_inquiry(inquiry: &Inquiry) -> Self {
        NotificationPayload::NewInquiry(InquirySummary {
            inquiry_id: inquiry.id,
            name: inquiry.name.clone(),
            email: inquiry.email.clone(),
            excerpt: excerpt(&inquiry.message, EXCERPT_MAX_CHARS),
        })
    }

    pub fn for_admission(admission: &AdmissionInquiry) -> Self {
        let basis = admission
            .care_service
            .as_deref()
            .or(admission.additional_info.as_deref())
            .unwrap_or_else(|| {
                admission
                    .medical_conditions
                    .first()
                    .map(String::as_str)
                    .unwrap_or_default()
            });
        NotificationPayload::NewAdmissionInquiry(AdmissionSummary {
            admission_inquiry_id: admission.id,
            name: admission.inquirer_name(),
            resident_name: admission.resident_name.clone(),
            care_service: admission.care_service.clone(),
            excerpt: excerpt(basis, EXCERPT_MAX_CHARS),
        })
    }
}

/// Shorten `text` to at most `max_chars` characters, ending in an ellipsis when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("Tour request", 100), "Tour request");
    }

    #[test]
    fn test_excerpt_cuts_on_char_boundary() {
        let text = "ñ".repeat(150);
        let out = excerpt(&text, 100);
        assert_eq!(out.chars().count(), 100);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_tagged_serialization() {
        let payload = NotificationPayload::NewInquiry(InquirySummary {
            inquiry_id: Uuid::nil(),
            name: "Maria Reyes".to_string(),
            email: "maria@example.com".to_string(),
            excerpt: "Tour request".to_string(),
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "new_inquiry");
        assert_eq!(json["data"]["name"], "Maria Reyes");
        assert_eq!(json["data"], payload.data());
    }

    #[test]
    fn test_decode_unknown_type_is_none() {
        let data = serde_json::json!({ "anything": true });
        assert!(NotificationPayload::decode("legacy_event", &data).is_none());
        assert!(NotificationPayload::decode("new_inquiry", &data).is_none());
    }

    #[test]
    fn test_decode_round_trip_via_columns() {
        let payload = NotificationPayload::NewAdmissionInquiry(AdmissionSummary {
            admission_inquiry_id: Uuid::new_v4(),
            name: "Ana Cruz".to_string(),
            resident_name: "Lola Cruz".to_string(),
            care_service: Some("Assisted living".to_string()),
            excerpt: "Assisted living".to_string(),
        });
        let decoded = NotificationPayload::decode(payload.type_name(), &payload.data());
        assert_eq!(decoded, Some(payload.clone()));
        assert_eq!(payload.headline(), "New admission inquiry for Lola Cruz");
    }
}
