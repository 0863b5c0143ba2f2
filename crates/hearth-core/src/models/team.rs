use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    /// Blob path of the profile photo
    pub photo: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTeamMember {
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TeamMemberUpdate {
    pub name: Option<String>,
    pub position: Option<String>,
    pub bio: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    /// Replacement photo path, already stored
    pub photo: Option<String>,
}

impl TeamMember {
    pub fn apply_update(&mut self, update: TeamMemberUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(sort_order) = update.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(photo) = update.photo {
            self.photo = Some(photo);
        }
        self.updated_at = now;
    }
}
