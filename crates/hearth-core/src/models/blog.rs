use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "blog_post_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum BlogPostStatus {
    Draft,
    Published,
}

impl Display for BlogPostStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BlogPostStatus::Draft => write!(f, "draft"),
            BlogPostStatus::Published => write!(f, "published"),
        }
    }
}

impl FromStr for BlogPostStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BlogPostStatus::Draft),
            "published" => Ok(BlogPostStatus::Published),
            _ => Err(anyhow::anyhow!("Invalid blog post status: {}", s)),
        }
    }
}

/// `published_at` after a save with `status`.
///
/// Publishing fills an absent timestamp with `now`. An existing timestamp is
/// kept either way.
pub fn resolve_published_at(
    status: BlogPostStatus,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        BlogPostStatus::Published => Some(current.unwrap_or(now)),
        BlogPostStatus::Draft => current,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BlogCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category with its number of published posts, for the blog sidebar.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CategoryWithCount {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub post_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BlogPost {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    /// Blob path of the featured image
    pub featured_image: Option<String>,
    pub status: BlogPostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn is_public(&self) -> bool {
        self.status == BlogPostStatus::Published && self.published_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: BlogPostStatus,
    /// Explicit publish date; publishing without one uses the current time
    pub published_at: Option<DateTime<Utc>>,
}

/// Admin-editable blog post fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BlogPostUpdate {
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub status: Option<BlogPostStatus>,
    /// Replacement featured image path, already stored
    pub featured_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    pub fn apply_update(&mut self, update: BlogPostUpdate, now: DateTime<Utc>) {
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(slug) = update.slug {
            self.slug = slug;
        }
        if let Some(excerpt) = update.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(featured_image) = update.featured_image {
            self.featured_image = Some(featured_image);
        }
        if let Some(published_at) = update.published_at {
            self.published_at = Some(published_at);
        }
        self.published_at = resolve_published_at(self.status, self.published_at, now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_publish_sets_missing_timestamp() {
        let now = Utc::now();
        assert_eq!(
            resolve_published_at(BlogPostStatus::Published, None, now),
            Some(now)
        );
    }

    #[test]
    fn test_publish_keeps_existing_timestamp() {
        let now = Utc::now();
        let earlier = now - Duration::days(3);
        assert_eq!(
            resolve_published_at(BlogPostStatus::Published, Some(earlier), now),
            Some(earlier)
        );
    }

    #[test]
    fn test_draft_leaves_timestamp_empty() {
        assert_eq!(
            resolve_published_at(BlogPostStatus::Draft, None, Utc::now()),
            None
        );
    }

    #[test]
    fn test_update_to_published_stamps_once() {
        let created = Utc::now() - Duration::days(1);
        let mut post = BlogPost {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            title: "Visiting hours".to_string(),
            slug: "visiting-hours".to_string(),
            excerpt: "When to visit".to_string(),
            content: "<p>Daily</p>".to_string(),
            featured_image: None,
            status: BlogPostStatus::Draft,
            published_at: None,
            created_at: created,
            updated_at: created,
        };
        let now = Utc::now();
        post.apply_update(
            BlogPostUpdate {
                status: Some(BlogPostStatus::Published),
                ..Default::default()
            },
            now,
        );
        assert!(post.is_public());
        assert_eq!(post.published_at, Some(now));

        post.apply_update(
            BlogPostUpdate {
                title: Some("Visiting hours, updated".to_string()),
                ..Default::default()
            },
            now + Duration::hours(1),
        );
        assert_eq!(post.published_at, Some(now));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        assert_eq!(
            "published".parse::<BlogPostStatus>().unwrap(),
            BlogPostStatus::Published
        );
        assert!("archived".parse::<BlogPostStatus>().is_err());
        assert_eq!(BlogPostStatus::Draft.to_string(), "draft");
    }

    #[test]
    fn test_update_with_explicit_date_overrides_stamp() {
        let now = Utc::now();
        let backdated = now - Duration::days(30);
        let mut post = BlogPost {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            title: "Garden party".to_string(),
            slug: "garden-party".to_string(),
            excerpt: "Photos".to_string(),
            content: "<p>Sun</p>".to_string(),
            featured_image: None,
            status: BlogPostStatus::Published,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        post.apply_update(
            BlogPostUpdate {
                published_at: Some(backdated),
                ..Default::default()
            },
            now,
        );
        assert_eq!(post.published_at, Some(backdated));
    }
}
