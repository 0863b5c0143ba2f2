use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "testimonial_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialStatus {
    Pending,
    Approved,
    Rejected,
}

impl Display for TestimonialStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TestimonialStatus::Pending => write!(f, "pending"),
            TestimonialStatus::Approved => write!(f, "approved"),
            TestimonialStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for TestimonialStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TestimonialStatus::Pending),
            "approved" => Ok(TestimonialStatus::Approved),
            "rejected" => Ok(TestimonialStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid testimonial status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    pub relation: String,
    pub content: String,
    pub rating: i16,
    pub status: TestimonialStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTestimonial {
    pub name: String,
    pub relation: String,
    pub content: String,
    pub rating: i16,
    pub status: TestimonialStatus,
}

#[derive(Debug, Clone, Default)]
pub struct TestimonialUpdate {
    pub name: Option<String>,
    pub relation: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i16>,
    pub status: Option<TestimonialStatus>,
}

impl Testimonial {
    pub fn apply_update(&mut self, update: TestimonialUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(relation) = update.relation {
            self.relation = relation;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}
