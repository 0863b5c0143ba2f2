use hearth_core::models::{
    BlogCategory, BlogPost, BlogPostUpdate, CategoryWithCount, NewBlogPost, Page, PageRequest,
    PER_PAGE,
};
use hearth_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Filter for the public blog index.
#[derive(Debug, Clone, Default)]
pub struct PublishedPostQuery {
    pub page: PageRequest,
    pub per_page: u32,
    /// Category slug. An unknown slug yields an empty page.
    pub category: Option<String>,
}

#[async_trait::async_trait]
pub trait BlogCategoryRepositoryTrait: Send + Sync {
    async fn create(&self, name: &str, slug: &str) -> Result<BlogCategory, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<BlogCategory>, AppError>;

    async fn list(&self, page: PageRequest) -> Result<Page<BlogCategory>, AppError>;

    /// Every category, alphabetical, with its number of published posts.
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, AppError>;

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<Option<BlogCategory>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// True if another category (other than `except`) already uses `name`.
    async fn name_taken(&self, name: &str, except: Option<Uuid>) -> Result<bool, AppError>;

    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, AppError>;

    /// Posts of any status still filed under the category.
    async fn post_count(&self, id: Uuid) -> Result<i64, AppError>;
}

#[async_trait::async_trait]
pub trait BlogPostRepositoryTrait: Send + Sync {
    /// Inserts the post. Publishing without a `published_at` stamps the current time.
    async fn create(&self, new: NewBlogPost) -> Result<BlogPost, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<BlogPost>, AppError>;

    /// Admin listing of every post, newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<BlogPost>, AppError>;

    /// Published posts only, most recently published first.
    async fn list_published(&self, query: PublishedPostQuery) -> Result<Page<BlogPost>, AppError>;

    async fn recent_published(
        &self,
        exclude: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<BlogPost>, AppError>;

    async fn get_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AppError>;

    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, AppError>;

    async fn update(&self, id: Uuid, update: BlogPostUpdate)
        -> Result<Option<BlogPost>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PostgresBlogCategoryRepository {
    pool: PgPool,
}

impl PostgresBlogCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BlogCategoryRepositoryTrait for PostgresBlogCategoryRepository {
    #[tracing::instrument(skip(self), fields(db.table = "blog_categories", db.operation = "insert"))]
    async fn create(&self, name: &str, slug: &str) -> Result<BlogCategory, AppError> {
        let category = sqlx::query_as::<Postgres, BlogCategory>(
            r#"
            INSERT INTO blog_categories (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_categories", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<Option<BlogCategory>, AppError> {
        let category = sqlx::query_as::<Postgres, BlogCategory>(
            "SELECT id, name, slug, created_at, updated_at FROM blog_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_categories", db.operation = "select"))]
    async fn list(&self, page: PageRequest) -> Result<Page<BlogCategory>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_categories")
            .fetch_one(&self.pool)
            .await?;

        let categories = sqlx::query_as::<Postgres, BlogCategory>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM blog_categories
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(PER_PAGE))
        .bind(page.offset(PER_PAGE))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(categories, page, PER_PAGE, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_categories", db.operation = "aggregate"))]
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, AppError> {
        let categories = sqlx::query_as::<Postgres, CategoryWithCount>(
            r#"
            SELECT c.id, c.name, c.slug, COUNT(p.id) AS post_count
            FROM blog_categories c
            LEFT JOIN blog_posts p
                ON p.category_id = c.id
                AND p.status = 'published'
                AND p.published_at IS NOT NULL
            GROUP BY c.id, c.name, c.slug
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_categories", db.operation = "update"))]
    async fn update(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<Option<BlogCategory>, AppError> {
        let category = sqlx::query_as::<Postgres, BlogCategory>(
            r#"
            UPDATE blog_categories
            SET name = $2, slug = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_categories", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blog_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_categories", db.operation = "select"))]
    async fn name_taken(&self, name: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM blog_categories
                WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_categories", db.operation = "select"))]
    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM blog_categories
                WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_posts", db.operation = "count"))]
    async fn post_count(&self, id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts WHERE category_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[derive(Clone)]
pub struct PostgresBlogPostRepository {
    pool: PgPool,
}

impl PostgresBlogPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BlogPostRepositoryTrait for PostgresBlogPostRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "blog_posts", db.operation = "insert"))]
    async fn create(&self, new: NewBlogPost) -> Result<BlogPost, AppError> {
        let post = sqlx::query_as::<Postgres, BlogPost>(
            r#"
            INSERT INTO blog_posts (
                category_id, title, slug, excerpt, content, featured_image, status, published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7,
                    CASE WHEN $7 = 'published'::blog_post_status
                         THEN COALESCE($8::timestamptz, NOW())
                         ELSE $8::timestamptz END)
            RETURNING id, category_id, title, slug, excerpt, content, featured_image,
                      status, published_at, created_at, updated_at
            "#,
        )
        .bind(new.category_id)
        .bind(&new.title)
        .bind(&new.slug)
        .bind(&new.excerpt)
        .bind(&new.content)
        .bind(&new.featured_image)
        .bind(new.status)
        .bind(new.published_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, status = %post.status, "Blog post created");
        Ok(post)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_posts", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<Option<BlogPost>, AppError> {
        let post = sqlx::query_as::<Postgres, BlogPost>(
            r#"
            SELECT id, category_id, title, slug, excerpt, content, featured_image,
                   status, published_at, created_at, updated_at
            FROM blog_posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_posts", db.operation = "select"))]
    async fn list(&self, page: PageRequest) -> Result<Page<BlogPost>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts")
            .fetch_one(&self.pool)
            .await?;

        let posts = sqlx::query_as::<Postgres, BlogPost>(
            r#"
            SELECT id, category_id, title, slug, excerpt, content, featured_image,
                   status, published_at, created_at, updated_at
            FROM blog_posts
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(PER_PAGE))
        .bind(page.offset(PER_PAGE))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(posts, page, PER_PAGE, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_posts", db.operation = "select"))]
    async fn list_published(&self, query: PublishedPostQuery) -> Result<Page<BlogPost>, AppError> {
        let per_page = query.per_page.max(1);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM blog_posts p
            LEFT JOIN blog_categories c ON c.id = p.category_id
            WHERE p.status = 'published'
                AND p.published_at IS NOT NULL
                AND ($1::text IS NULL OR c.slug = $1)
            "#,
        )
        .bind(&query.category)
        .fetch_one(&self.pool)
        .await?;

        let posts = sqlx::query_as::<Postgres, BlogPost>(
            r#"
            SELECT p.id, p.category_id, p.title, p.slug, p.excerpt, p.content, p.featured_image,
                   p.status, p.published_at, p.created_at, p.updated_at
            FROM blog_posts p
            LEFT JOIN blog_categories c ON c.id = p.category_id
            WHERE p.status = 'published'
                AND p.published_at IS NOT NULL
                AND ($1::text IS NULL OR c.slug = $1)
            ORDER BY p.published_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&query.category)
        .bind(i64::from(per_page))
        .bind(query.page.offset(per_page))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(posts, query.page, per_page, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_posts", db.operation = "select"))]
    async fn recent_published(
        &self,
        exclude: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<BlogPost>, AppError> {
        let posts = sqlx::query_as::<Postgres, BlogPost>(
            r#"
            SELECT id, category_id, title, slug, excerpt, content, featured_image,
                   status, published_at, created_at, updated_at
            FROM blog_posts
            WHERE status = 'published'
                AND published_at IS NOT NULL
                AND ($1::uuid IS NULL OR id <> $1)
            ORDER BY published_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(exclude)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_posts", db.operation = "select"))]
    async fn get_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AppError> {
        let post = sqlx::query_as::<Postgres, BlogPost>(
            r#"
            SELECT id, category_id, title, slug, excerpt, content, featured_image,
                   status, published_at, created_at, updated_at
            FROM blog_posts
            WHERE slug = $1 AND status = 'published' AND published_at IS NOT NULL
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_posts", db.operation = "select"))]
    async fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM blog_posts
                WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "blog_posts", db.operation = "update"))]
    async fn update(
        &self,
        id: Uuid,
        update: BlogPostUpdate,
    ) -> Result<Option<BlogPost>, AppError> {
        let post = sqlx::query_as::<Postgres, BlogPost>(
            r#"
            UPDATE blog_posts
            SET category_id = COALESCE($2, category_id),
                title = COALESCE($3, title),
                slug = COALESCE($4, slug),
                excerpt = COALESCE($5, excerpt),
                content = COALESCE($6, content),
                status = COALESCE($7, status),
                featured_image = COALESCE($8, featured_image),
                published_at = CASE
                    WHEN COALESCE($7, status) = 'published'::blog_post_status
                        THEN COALESCE($9::timestamptz, published_at, NOW())
                    ELSE COALESCE($9::timestamptz, published_at)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, category_id, title, slug, excerpt, content, featured_image,
                      status, published_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.category_id)
        .bind(&update.title)
        .bind(&update.slug)
        .bind(&update.excerpt)
        .bind(&update.content)
        .bind(update.status)
        .bind(&update.featured_image)
        .bind(update.published_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    #[tracing::instrument(skip(self), fields(db.table = "blog_posts", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
