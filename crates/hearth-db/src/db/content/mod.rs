pub mod blog;
pub mod team;
pub mod testimonial;

pub use blog::{
    BlogCategoryRepositoryTrait, BlogPostRepositoryTrait,
    PostgresBlogCategoryRepository as BlogCategoryRepository,
    PostgresBlogPostRepository as BlogPostRepository, PublishedPostQuery,
};
pub use team::{PostgresTeamRepository as TeamRepository, TeamRepositoryTrait};
pub use testimonial::{
    PostgresTestimonialRepository as TestimonialRepository, TestimonialRepositoryTrait,
};
