use chrono::Utc;
use hearth_core::models::{
    resolve_published_at, BlogCategory, BlogPost, BlogPostUpdate, CategoryWithCount, NewBlogPost,
    NewTeamMember, NewTestimonial, Page, PageRequest, TeamMember, TeamMemberUpdate, Testimonial,
    TestimonialStatus, TestimonialUpdate, PER_PAGE,
};
use hearth_core::AppError;
use uuid::Uuid;

use super::{remove_where, MemoryDatabase, Tables};
use crate::db::{
    BlogCategoryRepositoryTrait, BlogPostRepositoryTrait, PublishedPostQuery, TeamRepositoryTrait,
    TestimonialRepositoryTrait,
};

fn published_newest_first(tables: &Tables) -> Vec<BlogPost> {
    let mut posts: Vec<BlogPost> = tables
        .posts
        .iter()
        .rev()
        .filter(|p| p.is_public())
        .cloned()
        .collect();
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    posts
}

#[async_trait::async_trait]
impl BlogCategoryRepositoryTrait for MemoryDatabase {
    async fn create(&self, name: &str, slug: &str) -> Result<BlogCategory, AppError> {
        let now = Utc::now();
        let category = BlogCategory {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.categories.push(category.clone());
        Ok(category)
    }

    async fn get(&self, id: Uuid) -> Result<Option<BlogCategory>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<BlogCategory>, AppError> {
        let tables = self.tables.read().await;
        let newest_first = tables.categories.iter().rev().cloned().collect();
        Ok(Page::from_sorted(newest_first, page, PER_PAGE))
    }

    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, AppError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<CategoryWithCount> = tables
            .categories
            .iter()
            .map(|c| CategoryWithCount {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
                post_count: tables
                    .posts
                    .iter()
                    .filter(|p| p.category_id == c.id && p.is_public())
                    .count() as i64,
            })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<Option<BlogCategory>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = name.to_string();
        category.slug = slug.to_string();
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.categories, |c| c.id == id))
    }

    async fn name_taken(&self, name: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name) && Some(c.id) != except))
    }

    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .iter()
            .any(|c| c.slug == slug && Some(c.id) != except))
    }

    async fn post_count(&self, id: Uuid) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().filter(|p| p.category_id == id).count() as i64)
    }
}

#[async_trait::async_trait]
impl BlogPostRepositoryTrait for MemoryDatabase {
    async fn create(&self, new: NewBlogPost) -> Result<BlogPost, AppError> {
        let now = Utc::now();
        let post = BlogPost {
            id: Uuid::new_v4(),
            category_id: new.category_id,
            title: new.title,
            slug: new.slug,
            excerpt: new.excerpt,
            content: new.content,
            featured_image: new.featured_image,
            status: new.status,
            published_at: resolve_published_at(new.status, new.published_at, now),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.posts.push(post.clone());
        Ok(post)
    }

    async fn get(&self, id: Uuid) -> Result<Option<BlogPost>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<BlogPost>, AppError> {
        let tables = self.tables.read().await;
        let newest_first = tables.posts.iter().rev().cloned().collect();
        Ok(Page::from_sorted(newest_first, page, PER_PAGE))
    }

    async fn list_published(&self, query: PublishedPostQuery) -> Result<Page<BlogPost>, AppError> {
        let tables = self.tables.read().await;
        let category_id = match &query.category {
            None => None,
            Some(slug) => match tables.categories.iter().find(|c| &c.slug == slug) {
                Some(category) => Some(category.id),
                None => return Ok(Page::new(Vec::new(), query.page, query.per_page.max(1), 0)),
            },
        };
        let posts = published_newest_first(&tables)
            .into_iter()
            .filter(|p| category_id.map_or(true, |id| p.category_id == id))
            .collect();
        Ok(Page::from_sorted(posts, query.page, query.per_page.max(1)))
    }

    async fn recent_published(
        &self,
        exclude: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<BlogPost>, AppError> {
        let tables = self.tables.read().await;
        Ok(published_newest_first(&tables)
            .into_iter()
            .filter(|p| Some(p.id) != exclude)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn get_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|p| p.slug == slug && p.is_public())
            .cloned())
    }

    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != except))
    }

    async fn update(
        &self,
        id: Uuid,
        update: BlogPostUpdate,
    ) -> Result<Option<BlogPost>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.apply_update(update, Utc::now());
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.posts, |p| p.id == id))
    }
}

#[async_trait::async_trait]
impl TeamRepositoryTrait for MemoryDatabase {
    async fn create(&self, new: NewTeamMember) -> Result<TeamMember, AppError> {
        let now = Utc::now();
        let member = TeamMember {
            id: Uuid::new_v4(),
            name: new.name,
            position: new.position,
            bio: new.bio,
            photo: new.photo,
            sort_order: new.sort_order,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.team.push(member.clone());
        Ok(member)
    }

    async fn get(&self, id: Uuid) -> Result<Option<TeamMember>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.team.iter().find(|m| m.id == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<TeamMember>, AppError> {
        let tables = self.tables.read().await;
        let newest_first = tables.team.iter().rev().cloned().collect();
        Ok(Page::from_sorted(newest_first, page, PER_PAGE))
    }

    async fn list_active(&self) -> Result<Vec<TeamMember>, AppError> {
        let tables = self.tables.read().await;
        let mut members: Vec<TeamMember> =
            tables.team.iter().filter(|m| m.is_active).cloned().collect();
        members.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(members)
    }

    async fn update(
        &self,
        id: Uuid,
        update: TeamMemberUpdate,
    ) -> Result<Option<TeamMember>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(member) = tables.team.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        member.apply_update(update, Utc::now());
        Ok(Some(member.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.team, |m| m.id == id))
    }
}

#[async_trait::async_trait]
impl TestimonialRepositoryTrait for MemoryDatabase {
    async fn create(&self, new: NewTestimonial) -> Result<Testimonial, AppError> {
        let now = Utc::now();
        let testimonial = Testimonial {
            id: Uuid::new_v4(),
            name: new.name,
            relation: new.relation,
            content: new.content,
            rating: new.rating,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .testimonials
            .push(testimonial.clone());
        Ok(testimonial)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Testimonial>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.testimonials.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Testimonial>, AppError> {
        let tables = self.tables.read().await;
        let newest_first = tables.testimonials.iter().rev().cloned().collect();
        Ok(Page::from_sorted(newest_first, page, PER_PAGE))
    }

    async fn list_approved(&self, limit: i64) -> Result<Vec<Testimonial>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .testimonials
            .iter()
            .rev()
            .filter(|t| t.status == TestimonialStatus::Approved)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: Uuid,
        update: TestimonialUpdate,
    ) -> Result<Option<Testimonial>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(testimonial) = tables.testimonials.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        testimonial.apply_update(update, Utc::now());
        Ok(Some(testimonial.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.testimonials, |t| t.id == id))
    }
}
