use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Back-office user. Active staff receive in-app notifications.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StaffUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Blob path of the avatar image
    pub avatar: Option<String>,
    #[serde(skip_serializing, default)]
    pub api_token_hash: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStaffUser {
    pub name: String,
    pub email: String,
    pub api_token_hash: Option<String>,
}
