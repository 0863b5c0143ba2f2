//! Inquiry normalizer
//!
//! Turns raw contact-form and admission-wizard submissions into typed records.
//! The admission rules are grouped by wizard step; [`normalize_admission`] runs
//! all four groups, and the wizard runs one group at a time, so the client flow
//! and the server always agree on what a valid submission is.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rules::{FieldReader, LONG_TEXT_MAX, TEXT_MAX};
use super::submission::Submission;
use crate::models::{
    ContactMethod, FeedingTube, Gender, NewAdmissionInquiry, NewInquiry, Title,
};
use crate::validation::ValidationError;

pub fn normalize_contact(input: &Submission) -> Result<NewInquiry, ValidationError> {
    let mut reader = FieldReader::new(input);
    let name = reader.required_text("name", TEXT_MAX);
    let email = reader.email("email", true);
    let phone = reader.optional_text("phone", TEXT_MAX);
    let preferred_contact = reader.choice::<ContactMethod>("preferred_contact");
    let message = reader.required_text("message", LONG_TEXT_MAX);
    let errors = reader.finish();

    let (Some(name), Some(email), Some(message)) = (name, email, message) else {
        return Err(errors);
    };
    errors.into_result(NewInquiry {
        name,
        email,
        phone,
        preferred_contact,
        message,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStep {
    Inquirer,
    Resident,
    CareNeeds,
    Scheduling,
}

impl AdmissionStep {
    pub const ALL: [AdmissionStep; 4] = [
        AdmissionStep::Inquirer,
        AdmissionStep::Resident,
        AdmissionStep::CareNeeds,
        AdmissionStep::Scheduling,
    ];

    /// 1-based position shown in the progress bar.
    pub fn number(self) -> u8 {
        match self {
            AdmissionStep::Inquirer => 1,
            AdmissionStep::Resident => 2,
            AdmissionStep::CareNeeds => 3,
            AdmissionStep::Scheduling => 4,
        }
    }

    pub fn next(self) -> Option<AdmissionStep> {
        match self {
            AdmissionStep::Inquirer => Some(AdmissionStep::Resident),
            AdmissionStep::Resident => Some(AdmissionStep::CareNeeds),
            AdmissionStep::CareNeeds => Some(AdmissionStep::Scheduling),
            AdmissionStep::Scheduling => None,
        }
    }

    pub fn previous(self) -> Option<AdmissionStep> {
        match self {
            AdmissionStep::Inquirer => None,
            AdmissionStep::Resident => Some(AdmissionStep::Inquirer),
            AdmissionStep::CareNeeds => Some(AdmissionStep::Resident),
            AdmissionStep::Scheduling => Some(AdmissionStep::CareNeeds),
        }
    }

    pub fn fields(self) -> &'static [&'static str] {
        match self {
            AdmissionStep::Inquirer => &[
                "title",
                "first_name",
                "last_name",
                "address",
                "phone",
                "email",
                "preferred_contact",
            ],
            AdmissionStep::Resident => &[
                "resident_name",
                "resident_gender",
                "resident_address",
                "resident_date_of_birth",
                "relationship",
            ],
            AdmissionStep::CareNeeds => &[
                "care_service",
                "medical_conditions",
                "special_needs",
                "needs_mobility_assistance",
                "needs_medication_assistance",
                "needs_bathing_assistance",
                "has_feeding_tube",
            ],
            AdmissionStep::Scheduling => &[
                "move_in_timeline",
                "preferred_tour_date",
                "preferred_tour_time",
                "how_found_us",
                "additional_info",
            ],
        }
    }

    /// Step that owns `field`.
    pub fn of_field(field: &str) -> Option<AdmissionStep> {
        Self::ALL
            .into_iter()
            .find(|step| step.fields().contains(&field))
    }

    /// Errors for this step's fields only.
    pub fn validate(self, input: &Submission, today: NaiveDate) -> ValidationError {
        let mut reader = FieldReader::new(input);
        let mut draft = AdmissionDraft::default();
        draft.read_step(self, &mut reader, today);
        reader.finish()
    }
}

/// Admission fields as read so far; required ones stay `None` until valid.
#[derive(Default)]
struct AdmissionDraft {
    title: Option<Title>,
    first_name: Option<String>,
    last_name: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    preferred_contact: Option<ContactMethod>,
    resident_name: Option<String>,
    resident_gender: Option<Gender>,
    resident_address: Option<String>,
    resident_date_of_birth: Option<NaiveDate>,
    relationship: Option<String>,
    care_service: Option<String>,
    medical_conditions: Vec<String>,
    special_needs: Option<String>,
    needs_mobility_assistance: Option<bool>,
    needs_medication_assistance: Option<bool>,
    needs_bathing_assistance: Option<bool>,
    has_feeding_tube: Option<FeedingTube>,
    move_in_timeline: Option<String>,
    preferred_tour_date: Option<NaiveDate>,
    preferred_tour_time: Option<String>,
    how_found_us: Option<String>,
    additional_info: Option<String>,
}

impl AdmissionDraft {
    fn read_step(&mut self, step: AdmissionStep, r: &mut FieldReader<'_>, today: NaiveDate) {
        match step {
            AdmissionStep::Inquirer => {
                self.title = r.choice("title");
                self.first_name = r.required_text("first_name", TEXT_MAX);
                self.last_name = r.required_text("last_name", TEXT_MAX);
                self.address = r.optional_text("address", LONG_TEXT_MAX);
                self.phone = r.optional_text("phone", TEXT_MAX);
                self.email = r.email("email", false);
                self.preferred_contact = r.choice("preferred_contact");
            }
            AdmissionStep::Resident => {
                self.resident_name = r.required_text("resident_name", TEXT_MAX);
                self.resident_gender = r.choice("resident_gender");
                self.resident_address = r.optional_text("resident_address", LONG_TEXT_MAX);
                self.resident_date_of_birth = r.date_before("resident_date_of_birth", today);
                self.relationship = r.required_text("relationship", TEXT_MAX);
            }
            AdmissionStep::CareNeeds => {
                self.care_service = r.optional_text("care_service", TEXT_MAX);
                self.medical_conditions = r.required_list("medical_conditions", TEXT_MAX);
                self.special_needs = r.optional_text("special_needs", LONG_TEXT_MAX);
                self.needs_mobility_assistance = r.tri_state("needs_mobility_assistance");
                self.needs_medication_assistance = r.tri_state("needs_medication_assistance");
                self.needs_bathing_assistance = r.tri_state("needs_bathing_assistance");
                self.has_feeding_tube = r.choice("has_feeding_tube");
            }
            AdmissionStep::Scheduling => {
                self.move_in_timeline = r.optional_text("move_in_timeline", TEXT_MAX);
                self.preferred_tour_date = r.date_after("preferred_tour_date", today);
                self.preferred_tour_time = r.optional_text("preferred_tour_time", TEXT_MAX);
                self.how_found_us = r.optional_text("how_found_us", TEXT_MAX);
                self.additional_info = r.optional_text("additional_info", LONG_TEXT_MAX);
            }
        }
    }

    fn build(self) -> Option<NewAdmissionInquiry> {
        if self.medical_conditions.is_empty() {
            return None;
        }
        Some(NewAdmissionInquiry {
            title: self.title,
            first_name: self.first_name?,
            last_name: self.last_name?,
            address: self.address,
            phone: self.phone,
            email: self.email,
            preferred_contact: self.preferred_contact,
            resident_name: self.resident_name?,
            resident_gender: self.resident_gender,
            resident_address: self.resident_address,
            resident_date_of_birth: self.resident_date_of_birth,
            relationship: self.relationship?,
            care_service: self.care_service,
            medical_conditions: self.medical_conditions,
            special_needs: self.special_needs,
            needs_mobility_assistance: self.needs_mobility_assistance,
            needs_medication_assistance: self.needs_medication_assistance,
            needs_bathing_assistance: self.needs_bathing_assistance,
            has_feeding_tube: self.has_feeding_tube,
            move_in_timeline: self.move_in_timeline,
            preferred_tour_date: self.preferred_tour_date,
            preferred_tour_time: self.preferred_tour_time,
            how_found_us: self.how_found_us,
            additional_info: self.additional_info,
        })
    }
}

/// Validate and coerce a complete admission submission received on `today`.
pub fn normalize_admission(
    input: &Submission,
    today: NaiveDate,
) -> Result<NewAdmissionInquiry, ValidationError> {
    let mut reader = FieldReader::new(input);
    let mut draft = AdmissionDraft::default();
    for step in AdmissionStep::ALL {
        draft.read_step(step, &mut reader, today);
    }
    let errors = reader.finish();
    if !errors.is_empty() {
        return Err(errors);
    }
    draft.build().ok_or(errors)
}
