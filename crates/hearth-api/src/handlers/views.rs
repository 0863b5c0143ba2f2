//! Response shapes that pair stored rows with resolved blob URLs.

use hearth_core::models::{BlogPost, StaffUser, TeamMember};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::MediaState;

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogPostView {
    #[serde(flatten)]
    pub post: BlogPost,
    pub featured_image_url: Option<String>,
}

impl BlogPostView {
    pub fn new(post: BlogPost, media: &MediaState) -> Self {
        let featured_image_url = media.url_of(post.featured_image.as_deref());
        Self {
            post,
            featured_image_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeamMemberView {
    #[serde(flatten)]
    pub member: TeamMember,
    pub photo_url: Option<String>,
}

impl TeamMemberView {
    pub fn new(member: TeamMember, media: &MediaState) -> Self {
        let photo_url = media.url_of(member.photo.as_deref());
        Self { member, photo_url }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffView {
    #[serde(flatten)]
    pub staff: StaffUser,
    pub avatar_url: Option<String>,
}

impl StaffView {
    pub fn new(staff: StaffUser, media: &MediaState) -> Self {
        let avatar_url = media.url_of(staff.avatar.as_deref());
        Self { staff, avatar_url }
    }
}
