//! Plain-text staff email templates.

use hearth_core::models::NotificationPayload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
}

/// Admin URL of the record a notification refers to.
pub fn admin_link(payload: &NotificationPayload, app_url: &str) -> String {
    let base = app_url.trim_end_matches('/');
    match payload {
        NotificationPayload::NewInquiry(s) => format!("{}/admin/inquiries/{}", base, s.inquiry_id),
        NotificationPayload::NewAdmissionInquiry(s) => {
            format!("{}/admin/admission-inquiries/{}", base, s.admission_inquiry_id)
        }
    }
}

pub fn staff_email(payload: &NotificationPayload, app_name: &str, app_url: &str) -> EmailContent {
    let subject = format!("[{}] {}", app_name, payload.headline());

    let mut lines = Vec::new();
    match payload {
        NotificationPayload::NewInquiry(s) => {
            lines.push("A new contact inquiry has arrived.".to_string());
            lines.push(String::new());
            lines.push(format!("Name: {}", s.name));
            lines.push(format!("Email: {}", s.email));
            lines.push(format!("Message: {}", s.excerpt));
        }
        NotificationPayload::NewAdmissionInquiry(s) => {
            lines.push("A new admission inquiry has arrived.".to_string());
            lines.push(String::new());
            lines.push(format!("Inquirer: {}", s.name));
            lines.push(format!("Resident: {}", s.resident_name));
            if let Some(service) = &s.care_service {
                lines.push(format!("Care service: {}", service));
            }
            lines.push(format!("Summary: {}", s.excerpt));
        }
    }
    lines.push(String::new());
    lines.push(format!("View it in the admin: {}", admin_link(payload, app_url)));
    lines.push(String::new());
    lines.push("--".to_string());
    lines.push(format!("Sent by {}", app_name));

    EmailContent {
        subject,
        body: lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::models::{AdmissionSummary, InquirySummary};
    use uuid::Uuid;

    #[test]
    fn test_contact_email() {
        let id = Uuid::new_v4();
        let payload = NotificationPayload::NewInquiry(InquirySummary {
            inquiry_id: id,
            name: "Maria Reyes".to_string(),
            email: "maria@example.com".to_string(),
            excerpt: "Tour request".to_string(),
        });
        let email = staff_email(&payload, "Hearth", "https://hearth.example/");
        assert_eq!(email.subject, "[Hearth] New contact inquiry from Maria Reyes");
        assert!(email.body.contains("Message: Tour request"));
        assert!(email
            .body
            .contains(&format!("https://hearth.example/admin/inquiries/{}", id)));
        assert!(email.body.ends_with("Sent by Hearth"));
    }

    #[test]
    fn test_admission_email_skips_missing_service() {
        let payload = NotificationPayload::NewAdmissionInquiry(AdmissionSummary {
            admission_inquiry_id: Uuid::new_v4(),
            name: "Ana Cruz".to_string(),
            resident_name: "Lola Cruz".to_string(),
            care_service: None,
            excerpt: "Dementia".to_string(),
        });
        let email = staff_email(&payload, "Hearth", "http://localhost:4000");
        assert_eq!(email.subject, "[Hearth] New admission inquiry for Lola Cruz");
        assert!(!email.body.contains("Care service"));
        assert!(email.body.contains("/admin/admission-inquiries/"));
    }
}
