//! Closed option sets offered by the inquiry forms.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A closed set of string options.
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }

    fn options() -> Vec<&'static str> {
        Self::ALL.iter().map(Choice::as_str).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text"))]
pub enum Title {
    Mr,
    Mrs,
    Ms,
    Miss,
    Dr,
}

impl Choice for Title {
    const ALL: &'static [Self] = &[Title::Mr, Title::Mrs, Title::Ms, Title::Miss, Title::Dr];

    fn as_str(&self) -> &'static str {
        match self {
            Title::Mr => "Mr",
            Title::Mrs => "Mrs",
            Title::Ms => "Ms",
            Title::Miss => "Miss",
            Title::Dr => "Dr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Phone,
    Email,
    Either,
}

impl Choice for ContactMethod {
    const ALL: &'static [Self] = &[
        ContactMethod::Phone,
        ContactMethod::Email,
        ContactMethod::Either,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Phone => "phone",
            ContactMethod::Email => "email",
            ContactMethod::Either => "either",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text"))]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female, Gender::Other];

    fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// Answer to "does the resident use a feeding tube".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "text"))]
pub enum FeedingTube {
    Yes,
    No,
    Sometimes,
}

impl Choice for FeedingTube {
    const ALL: &'static [Self] = &[FeedingTube::Yes, FeedingTube::No, FeedingTube::Sometimes];

    fn as_str(&self) -> &'static str {
        match self {
            FeedingTube::Yes => "Yes",
            FeedingTube::No => "No",
            FeedingTube::Sometimes => "Sometimes",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(Title::parse("Dr"), Some(Title::Dr));
        assert_eq!(Title::parse("dr"), None);
        assert_eq!(ContactMethod::parse("either"), Some(ContactMethod::Either));
        assert_eq!(FeedingTube::parse("Maybe"), None);
    }

    #[test]
    fn test_serde_matches_as_str() {
        for method in ContactMethod::ALL {
            let json = serde_json::to_value(method).unwrap();
            assert_eq!(json, method.as_str());
        }
        for gender in Gender::ALL {
            let json = serde_json::to_value(gender).unwrap();
            assert_eq!(json, gender.as_str());
        }
    }
}
