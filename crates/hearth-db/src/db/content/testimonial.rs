use hearth_core::models::{
    NewTestimonial, Page, PageRequest, Testimonial, TestimonialStatus, TestimonialUpdate, PER_PAGE,
};
use hearth_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait TestimonialRepositoryTrait: Send + Sync {
    async fn create(&self, new: NewTestimonial) -> Result<Testimonial, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Testimonial>, AppError>;

    async fn list(&self, page: PageRequest) -> Result<Page<Testimonial>, AppError>;

    /// Approved testimonials, newest first.
    async fn list_approved(&self, limit: i64) -> Result<Vec<Testimonial>, AppError>;

    async fn update(
        &self,
        id: Uuid,
        update: TestimonialUpdate,
    ) -> Result<Option<Testimonial>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PostgresTestimonialRepository {
    pool: PgPool,
}

impl PostgresTestimonialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TestimonialRepositoryTrait for PostgresTestimonialRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "testimonials", db.operation = "insert"))]
    async fn create(&self, new: NewTestimonial) -> Result<Testimonial, AppError> {
        let testimonial = sqlx::query_as::<Postgres, Testimonial>(
            r#"
            INSERT INTO testimonials (name, relation, content, rating, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, relation, content, rating, status, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.relation)
        .bind(&new.content)
        .bind(new.rating)
        .bind(new.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(testimonial)
    }

    #[tracing::instrument(skip(self), fields(db.table = "testimonials", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<Option<Testimonial>, AppError> {
        let testimonial = sqlx::query_as::<Postgres, Testimonial>(
            r#"
            SELECT id, name, relation, content, rating, status, created_at, updated_at
            FROM testimonials
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(testimonial)
    }

    #[tracing::instrument(skip(self), fields(db.table = "testimonials", db.operation = "select"))]
    async fn list(&self, page: PageRequest) -> Result<Page<Testimonial>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM testimonials")
            .fetch_one(&self.pool)
            .await?;

        let testimonials = sqlx::query_as::<Postgres, Testimonial>(
            r#"
            SELECT id, name, relation, content, rating, status, created_at, updated_at
            FROM testimonials
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(PER_PAGE))
        .bind(page.offset(PER_PAGE))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(testimonials, page, PER_PAGE, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "testimonials", db.operation = "select"))]
    async fn list_approved(&self, limit: i64) -> Result<Vec<Testimonial>, AppError> {
        let testimonials = sqlx::query_as::<Postgres, Testimonial>(
            r#"
            SELECT id, name, relation, content, rating, status, created_at, updated_at
            FROM testimonials
            WHERE status = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(TestimonialStatus::Approved)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(testimonials)
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "testimonials", db.operation = "update"))]
    async fn update(
        &self,
        id: Uuid,
        update: TestimonialUpdate,
    ) -> Result<Option<Testimonial>, AppError> {
        let testimonial = sqlx::query_as::<Postgres, Testimonial>(
            r#"
            UPDATE testimonials
            SET name = COALESCE($2, name),
                relation = COALESCE($3, relation),
                content = COALESCE($4, content),
                rating = COALESCE($5, rating),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, relation, content, rating, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.relation)
        .bind(&update.content)
        .bind(update.rating)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(testimonial)
    }

    #[tracing::instrument(skip(self), fields(db.table = "testimonials", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
