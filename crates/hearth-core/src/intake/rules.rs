//! Field rules shared by every form: the public intake forms and the admin
//! content forms.
//!
//! A [`FieldReader`] pulls typed values out of a [`Submission`] and records the
//! first failure per field. Callers read every field they need, then call
//! [`FieldReader::finish`] to get the collected errors.

use chrono::{DateTime, NaiveDate, Utc};
use validator::ValidateEmail;

use super::submission::Submission;
use crate::models::Choice;
use crate::validation::ValidationError;

pub const TEXT_MAX: usize = 255;
pub const LONG_TEXT_MAX: usize = 5000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Map a tri-state radio answer onto a nullable boolean.
///
/// Only the exact literals `"Yes"` and `"No"` carry meaning. Everything else,
/// including other casings and the empty string, is "unanswered".
pub fn tri_state(value: Option<&str>) -> Option<bool> {
    match value {
        Some("Yes") => Some(true),
        Some("No") => Some(false),
        _ => None,
    }
}

pub fn label(field: &str) -> String {
    field.replace('_', " ")
}

pub struct FieldReader<'a> {
    input: &'a Submission,
    errors: ValidationError,
}

impl<'a> FieldReader<'a> {
    pub fn new(input: &'a Submission) -> Self {
        Self {
            input,
            errors: ValidationError::new(),
        }
    }

    fn fail(&mut self, field: &str, message: String) {
        self.errors.add(field, message);
    }

    fn within_limit(&mut self, field: &str, value: &str, max: usize) -> bool {
        if value.chars().count() > max {
            self.fail(
                field,
                format!(
                    "The {} may not be greater than {} characters.",
                    label(field),
                    max
                ),
            );
            return false;
        }
        true
    }

    pub fn required_text(&mut self, field: &str, max: usize) -> Option<String> {
        match self.input.text(field) {
            None => {
                self.fail(field, format!("The {} field is required.", label(field)));
                None
            }
            Some(value) => self
                .within_limit(field, value, max)
                .then(|| value.to_string()),
        }
    }

    pub fn optional_text(&mut self, field: &str, max: usize) -> Option<String> {
        let value = self.input.text(field)?;
        self.within_limit(field, value, max)
            .then(|| value.to_string())
    }

    pub fn email(&mut self, field: &str, required: bool) -> Option<String> {
        let value = if required {
            self.required_text(field, TEXT_MAX)?
        } else {
            self.optional_text(field, TEXT_MAX)?
        };
        if !value.validate_email() {
            self.fail(
                field,
                format!("The {} must be a valid email address.", label(field)),
            );
            return None;
        }
        Some(value)
    }

    /// Omitted is fine; present but outside the option set is an error.
    pub fn choice<C: Choice>(&mut self, field: &str) -> Option<C> {
        let value = self.input.text(field)?;
        match C::parse(value) {
            Some(choice) => Some(choice),
            None => {
                self.fail(field, format!("The selected {} is invalid.", label(field)));
                None
            }
        }
    }

    pub fn tri_state(&self, field: &str) -> Option<bool> {
        tri_state(self.input.raw(field))
    }

    fn date(&mut self, field: &str) -> Option<NaiveDate> {
        let value = self.input.text(field)?;
        match NaiveDate::parse_from_str(value, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.fail(field, format!("The {} is not a valid date.", label(field)));
                None
            }
        }
    }

    /// Optional date strictly earlier than `today`.
    pub fn date_before(&mut self, field: &str, today: NaiveDate) -> Option<NaiveDate> {
        let date = self.date(field)?;
        if date >= today {
            self.fail(
                field,
                format!("The {} must be a date before today.", label(field)),
            );
            return None;
        }
        Some(date)
    }

    /// Optional date strictly later than `today`.
    pub fn date_after(&mut self, field: &str, today: NaiveDate) -> Option<NaiveDate> {
        let date = self.date(field)?;
        if date <= today {
            self.fail(
                field,
                format!("The {} must be a date after today.", label(field)),
            );
            return None;
        }
        Some(date)
    }

    /// Optional instant, RFC 3339 or a bare date taken as midnight UTC.
    pub fn timestamp(&mut self, field: &str) -> Option<DateTime<Utc>> {
        let value = self.input.text(field)?;
        if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
            return Some(instant.with_timezone(&Utc));
        }
        match NaiveDate::parse_from_str(value, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            Some(midnight) => Some(midnight.and_utc()),
            None => {
                self.fail(field, format!("The {} must be a valid date.", label(field)));
                None
            }
        }
    }

    /// Non-empty list of trimmed entries, each within `max`.
    pub fn required_list(&mut self, field: &str, max: usize) -> Vec<String> {
        let items = self.input.list(field);
        if items.is_empty() {
            self.fail(
                field,
                format!("The {} field must have at least one item.", label(field)),
            );
            return items;
        }
        if let Some(too_long) = items.iter().find(|i| i.chars().count() > max) {
            let too_long = too_long.clone();
            self.within_limit(field, &too_long, max);
        }
        items
    }

    /// Optional whole number within `min..=max`.
    pub fn integer(&mut self, field: &str, min: i64, max: i64) -> Option<i64> {
        let value = self.input.text(field)?;
        match value.parse::<i64>() {
            Ok(n) if (min..=max).contains(&n) => Some(n),
            Ok(_) => {
                self.fail(
                    field,
                    format!("The {} must be between {} and {}.", label(field), min, max),
                );
                None
            }
            Err(_) => {
                self.fail(field, format!("The {} must be an integer.", label(field)));
                None
            }
        }
    }

    /// Optional checkbox-style boolean: `1`/`true`/`on`/`yes` or `0`/`false`/`off`/`no`.
    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        let value = self.input.text(field)?;
        match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" => Some(false),
            _ => {
                self.fail(
                    field,
                    format!("The {} field must be true or false.", label(field)),
                );
                None
            }
        }
    }

    /// Identifier of a referenced record.
    pub fn id(&mut self, field: &str, required: bool) -> Option<uuid::Uuid> {
        let value = if required {
            self.required_text(field, TEXT_MAX)?
        } else {
            self.optional_text(field, TEXT_MAX)?
        };
        match uuid::Uuid::parse_str(&value) {
            Ok(id) => Some(id),
            Err(_) => {
                self.fail(field, format!("The selected {} is invalid.", label(field)));
                None
            }
        }
    }

    /// Record a failure found outside the reader, e.g. a uniqueness check.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.fail(field, message.into());
    }

    pub fn finish(self) -> ValidationError {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedingTube, Title};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_tri_state_is_exact() {
        assert_eq!(tri_state(Some("Yes")), Some(true));
        assert_eq!(tri_state(Some("No")), Some(false));
        assert_eq!(tri_state(Some("yes")), None);
        assert_eq!(tri_state(Some("")), None);
        assert_eq!(tri_state(Some("Maybe")), None);
        assert_eq!(tri_state(Some(" Yes")), None);
        assert_eq!(tri_state(None), None);
    }

    #[test]
    fn test_required_text_reports_missing() {
        let input = Submission::from_pairs(vec![("first_name", "  ")]);
        let mut reader = FieldReader::new(&input);
        assert_eq!(reader.required_text("first_name", TEXT_MAX), None);
        let errors = reader.finish();
        assert_eq!(
            errors.get("first_name"),
            Some("The first name field is required.")
        );
    }

    #[test]
    fn test_length_cap() {
        let long = "x".repeat(TEXT_MAX + 1);
        let input = Submission::from_pairs(vec![("name", long.as_str())]);
        let mut reader = FieldReader::new(&input);
        assert_eq!(reader.required_text("name", TEXT_MAX), None);
        assert!(reader.finish().get("name").unwrap().contains("255"));
    }

    #[test]
    fn test_choice_omitted_vs_invalid() {
        let input = Submission::from_pairs(vec![("title", "Sir"), ("has_feeding_tube", "")]);
        let mut reader = FieldReader::new(&input);
        assert_eq!(reader.choice::<Title>("title"), None);
        assert_eq!(reader.choice::<FeedingTube>("has_feeding_tube"), None);
        assert_eq!(reader.choice::<FeedingTube>("absent"), None);
        let errors = reader.finish();
        assert_eq!(errors.get("title"), Some("The selected title is invalid."));
        assert!(!errors.contains("has_feeding_tube"));
        assert!(!errors.contains("absent"));
    }

    #[test]
    fn test_date_bounds_are_exclusive() {
        let input = Submission::from_pairs(vec![
            ("dob_today", "2025-06-15"),
            ("dob_yesterday", "2025-06-14"),
            ("tour_today", "2025-06-15"),
            ("tour_tomorrow", "2025-06-16"),
            ("garbage", "next week"),
        ]);
        let mut reader = FieldReader::new(&input);
        assert_eq!(reader.date_before("dob_today", today()), None);
        assert!(reader.date_before("dob_yesterday", today()).is_some());
        assert_eq!(reader.date_after("tour_today", today()), None);
        assert!(reader.date_after("tour_tomorrow", today()).is_some());
        assert_eq!(reader.date_after("garbage", today()), None);
        let errors = reader.finish();
        assert!(errors.contains("dob_today"));
        assert!(errors.contains("tour_today"));
        assert!(errors.contains("garbage"));
        assert!(!errors.contains("dob_yesterday"));
        assert!(!errors.contains("tour_tomorrow"));
    }

    #[test]
    fn test_email_format() {
        let input = Submission::from_pairs(vec![("email", "not-an-email")]);
        let mut reader = FieldReader::new(&input);
        assert_eq!(reader.email("email", true), None);
        assert_eq!(
            reader.finish().get("email"),
            Some("The email must be a valid email address.")
        );
    }

    #[test]
    fn test_required_list_drops_blank_entries() {
        let input = Submission::from_pairs(vec![
            ("medical_conditions[]", " "),
            ("medical_conditions[]", ""),
        ]);
        let mut reader = FieldReader::new(&input);
        assert!(reader.required_list("medical_conditions", TEXT_MAX).is_empty());
        assert!(reader.finish().contains("medical_conditions"));
    }

    #[test]
    fn test_integer_range_and_format() {
        let input = Submission::from_pairs(vec![("rating", "6"), ("order", "two"), ("age", "4")]);
        let mut reader = FieldReader::new(&input);
        assert_eq!(reader.integer("rating", 1, 5), None);
        assert_eq!(reader.integer("order", 0, 100), None);
        assert_eq!(reader.integer("age", 0, 10), Some(4));
        assert_eq!(reader.integer("missing", 0, 10), None);
        let errors = reader.finish();
        assert_eq!(errors.get("rating"), Some("The rating must be between 1 and 5."));
        assert_eq!(errors.get("order"), Some("The order must be an integer."));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_boolean_and_id() {
        let id = uuid::Uuid::new_v4().to_string();
        let input = Submission::from_pairs(vec![
            ("is_active", "on"),
            ("featured", "maybe"),
            ("category_id", id.as_str()),
            ("author_id", "nope"),
        ]);
        let mut reader = FieldReader::new(&input);
        assert_eq!(reader.boolean("is_active"), Some(true));
        assert_eq!(reader.boolean("featured"), None);
        assert_eq!(reader.id("category_id", true).map(|u| u.to_string()), Some(id));
        assert_eq!(reader.id("author_id", false), None);
        assert_eq!(reader.id("editor_id", true), None);
        let errors = reader.finish();
        assert!(errors.contains("featured"));
        assert_eq!(errors.get("author_id"), Some("The selected author id is invalid."));
        assert_eq!(errors.get("editor_id"), Some("The editor id field is required."));
    }

    #[test]
    fn test_timestamp_formats() {
        let input = Submission::from_pairs(vec![
            ("published_at", "2025-03-01T09:30:00+02:00"),
            ("scheduled", "2025-03-01"),
            ("garbled", "last tuesday"),
        ]);
        let mut reader = FieldReader::new(&input);

        let published = reader.timestamp("published_at").unwrap();
        assert_eq!(published.to_rfc3339(), "2025-03-01T07:30:00+00:00");
        let scheduled = reader.timestamp("scheduled").unwrap();
        assert_eq!(scheduled.to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert!(reader.timestamp("garbled").is_none());
        assert!(reader.timestamp("missing").is_none());

        let errors = reader.finish();
        assert_eq!(errors.get("garbled"), Some("The garbled must be a valid date."));
        assert_eq!(errors.len(), 1);
    }
}
