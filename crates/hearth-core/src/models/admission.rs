use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

use super::choice::{ContactMethod, FeedingTube, Gender, Title};
use super::status::{stamp_once, StatusLifecycle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "admission_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    New,
    Read,
    InProgress,
    TourScheduled,
    Admitted,
    Declined,
    Closed,
}

impl StatusLifecycle for AdmissionStatus {
    const ALL: &'static [Self] = &[
        AdmissionStatus::New,
        AdmissionStatus::Read,
        AdmissionStatus::InProgress,
        AdmissionStatus::TourScheduled,
        AdmissionStatus::Admitted,
        AdmissionStatus::Declined,
        AdmissionStatus::Closed,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            AdmissionStatus::New => "new",
            AdmissionStatus::Read => "read",
            AdmissionStatus::InProgress => "in_progress",
            AdmissionStatus::TourScheduled => "tour_scheduled",
            AdmissionStatus::Admitted => "admitted",
            AdmissionStatus::Declined => "declined",
            AdmissionStatus::Closed => "closed",
        }
    }

    fn timestamp_column(&self) -> Option<&'static str> {
        match self {
            AdmissionStatus::New => None,
            AdmissionStatus::Read => Some("read_at"),
            AdmissionStatus::InProgress => Some("in_progress_at"),
            AdmissionStatus::TourScheduled => Some("tour_scheduled_at"),
            AdmissionStatus::Admitted => Some("admitted_at"),
            AdmissionStatus::Declined => Some("declined_at"),
            AdmissionStatus::Closed => Some("closed_at"),
        }
    }
}

impl Display for AdmissionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Detailed admission request submitted through the four-step wizard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AdmissionInquiry {
    pub id: Uuid,
    pub title: Option<Title>,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferred_contact: Option<ContactMethod>,
    pub resident_name: String,
    pub resident_gender: Option<Gender>,
    pub resident_address: Option<String>,
    pub resident_date_of_birth: Option<NaiveDate>,
    pub relationship: String,
    pub care_service: Option<String>,
    pub medical_conditions: Vec<String>,
    pub special_needs: Option<String>,
    pub needs_mobility_assistance: Option<bool>,
    pub needs_medication_assistance: Option<bool>,
    pub needs_bathing_assistance: Option<bool>,
    pub has_feeding_tube: Option<FeedingTube>,
    pub move_in_timeline: Option<String>,
    pub preferred_tour_date: Option<NaiveDate>,
    pub preferred_tour_time: Option<String>,
    pub how_found_us: Option<String>,
    pub additional_info: Option<String>,
    pub status: AdmissionStatus,
    pub read_at: Option<DateTime<Utc>>,
    pub in_progress_at: Option<DateTime<Utc>>,
    pub tour_scheduled_at: Option<DateTime<Utc>>,
    pub admitted_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdmissionInquiry {
    pub fn from_new(id: Uuid, new: NewAdmissionInquiry, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            first_name: new.first_name,
            last_name: new.last_name,
            address: new.address,
            phone: new.phone,
            email: new.email,
            preferred_contact: new.preferred_contact,
            resident_name: new.resident_name,
            resident_gender: new.resident_gender,
            resident_address: new.resident_address,
            resident_date_of_birth: new.resident_date_of_birth,
            relationship: new.relationship,
            care_service: new.care_service,
            medical_conditions: new.medical_conditions,
            special_needs: new.special_needs,
            needs_mobility_assistance: new.needs_mobility_assistance,
            needs_medication_assistance: new.needs_medication_assistance,
            needs_bathing_assistance: new.needs_bathing_assistance,
            has_feeding_tube: new.has_feeding_tube,
            move_in_timeline: new.move_in_timeline,
            preferred_tour_date: new.preferred_tour_date,
            preferred_tour_time: new.preferred_tour_time,
            how_found_us: new.how_found_us,
            additional_info: new.additional_info,
            status: AdmissionStatus::New,
            read_at: None,
            in_progress_at: None,
            tour_scheduled_at: None,
            admitted_at: None,
            declined_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn inquirer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Move to `status`, stamping its timestamp only on first reach.
    pub fn apply_status(&mut self, status: AdmissionStatus, now: DateTime<Utc>) {
        self.status = status;
        let slot = match status {
            AdmissionStatus::New => None,
            AdmissionStatus::Read => Some(&mut self.read_at),
            AdmissionStatus::InProgress => Some(&mut self.in_progress_at),
            AdmissionStatus::TourScheduled => Some(&mut self.tour_scheduled_at),
            AdmissionStatus::Admitted => Some(&mut self.admitted_at),
            AdmissionStatus::Declined => Some(&mut self.declined_at),
            AdmissionStatus::Closed => Some(&mut self.closed_at),
        };
        if let Some(slot) = slot {
            stamp_once(slot, now);
        }
        self.updated_at = now;
    }

    /// Status timestamps in lifecycle order, for rendering a timeline.
    pub fn status_timestamps(&self) -> [(AdmissionStatus, Option<DateTime<Utc>>); 6] {
        [
            (AdmissionStatus::Read, self.read_at),
            (AdmissionStatus::InProgress, self.in_progress_at),
            (AdmissionStatus::TourScheduled, self.tour_scheduled_at),
            (AdmissionStatus::Admitted, self.admitted_at),
            (AdmissionStatus::Declined, self.declined_at),
            (AdmissionStatus::Closed, self.closed_at),
        ]
    }
}

/// Normalized admission submission, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdmissionInquiry {
    pub title: Option<Title>,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferred_contact: Option<ContactMethod>,
    pub resident_name: String,
    pub resident_gender: Option<Gender>,
    pub resident_address: Option<String>,
    pub resident_date_of_birth: Option<NaiveDate>,
    pub relationship: String,
    pub care_service: Option<String>,
    pub medical_conditions: Vec<String>,
    pub special_needs: Option<String>,
    pub needs_mobility_assistance: Option<bool>,
    pub needs_medication_assistance: Option<bool>,
    pub needs_bathing_assistance: Option<bool>,
    pub has_feeding_tube: Option<FeedingTube>,
    pub move_in_timeline: Option<String>,
    pub preferred_tour_date: Option<NaiveDate>,
    pub preferred_tour_time: Option<String>,
    pub how_found_us: Option<String>,
    pub additional_info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::parse_status;
    use chrono::Duration;

    fn sample() -> AdmissionInquiry {
        AdmissionInquiry::from_new(
            Uuid::new_v4(),
            NewAdmissionInquiry {
                title: None,
                first_name: "Ana".to_string(),
                last_name: "Cruz".to_string(),
                address: None,
                phone: None,
                email: None,
                preferred_contact: None,
                resident_name: "Lola Cruz".to_string(),
                resident_gender: None,
                resident_address: None,
                resident_date_of_birth: None,
                relationship: "Daughter".to_string(),
                care_service: None,
                medical_conditions: vec!["Diabetes".to_string()],
                special_needs: None,
                needs_mobility_assistance: None,
                needs_medication_assistance: None,
                needs_bathing_assistance: None,
                has_feeding_tube: None,
                move_in_timeline: None,
                preferred_tour_date: None,
                preferred_tour_time: None,
                how_found_us: None,
                additional_info: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_each_status_stamps_its_own_column() {
        let mut admission = sample();
        let now = Utc::now();
        admission.apply_status(AdmissionStatus::TourScheduled, now);
        assert_eq!(admission.tour_scheduled_at, Some(now));
        assert!(admission.read_at.is_none());
        assert!(admission.admitted_at.is_none());
    }

    #[test]
    fn test_stamps_are_never_overwritten() {
        let mut admission = sample();
        let first = Utc::now();
        admission.apply_status(AdmissionStatus::InProgress, first);
        admission.apply_status(AdmissionStatus::Declined, first + Duration::hours(1));
        admission.apply_status(AdmissionStatus::InProgress, first + Duration::hours(2));
        assert_eq!(admission.in_progress_at, Some(first));
        assert_eq!(admission.declined_at, Some(first + Duration::hours(1)));
        assert_eq!(admission.status, AdmissionStatus::InProgress);
    }

    #[test]
    fn test_parse_status_membership() {
        assert_eq!(
            parse_status::<AdmissionStatus>("tour_scheduled").unwrap(),
            AdmissionStatus::TourScheduled
        );
        let err = parse_status::<AdmissionStatus>("replied").unwrap_err();
        assert!(err.contains("status"));
    }

    #[test]
    fn test_every_non_new_status_has_a_column() {
        for status in AdmissionStatus::ALL {
            assert_eq!(
                status.timestamp_column().is_some(),
                *status != AdmissionStatus::New
            );
        }
    }
}
