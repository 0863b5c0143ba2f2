//! Test data builders.

use axum_test::multipart::{MultipartForm, Part};
use hearth_core::models::{
    BlogCategory, BlogPost, BlogPostStatus, NewBlogPost, NewTeamMember, TeamMember,
};
use hearth_db::{BlogCategoryRepositoryTrait, BlogPostRepositoryTrait, MemoryDatabase, TeamRepositoryTrait};

/// Smallest valid PNG: 1x1 transparent pixel.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

pub fn png_part(filename: &str) -> Part {
    Part::bytes(create_minimal_png())
        .file_name(filename)
        .mime_type("image/png")
}

pub fn team_form(name: &str, position: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name)
        .add_text("position", position)
}

pub async fn create_category(db: &MemoryDatabase, name: &str, slug: &str) -> BlogCategory {
    BlogCategoryRepositoryTrait::create(db, name, slug)
        .await
        .expect("Failed to create category")
}

pub async fn create_post(
    db: &MemoryDatabase,
    category: &BlogCategory,
    title: &str,
    slug: &str,
    status: BlogPostStatus,
) -> BlogPost {
    BlogPostRepositoryTrait::create(
        db,
        NewBlogPost {
            category_id: category.id,
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: format!("About {}", title),
            content: format!("<p>{}</p>", title),
            featured_image: None,
            status,
            published_at: None,
        },
    )
    .await
    .expect("Failed to create post")
}

pub async fn create_member(db: &MemoryDatabase, name: &str, photo: Option<String>) -> TeamMember {
    TeamRepositoryTrait::create(
        db,
        NewTeamMember {
            name: name.to_string(),
            position: "Caregiver".to_string(),
            bio: None,
            photo,
            sort_order: 0,
            is_active: true,
        },
    )
    .await
    .expect("Failed to create team member")
}
