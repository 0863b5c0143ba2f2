use hearth_core::models::{Inquiry, InquiryStatus, NewInquiry, Page, PageRequest, StatusLifecycle, PER_PAGE};
use hearth_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Contact inquiry persistence
#[async_trait::async_trait]
pub trait InquiryRepositoryTrait: Send + Sync {
    async fn create(&self, new: NewInquiry) -> Result<Inquiry, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Inquiry>, AppError>;

    /// Newest first, [`PER_PAGE`] per page.
    async fn list(&self, page: PageRequest) -> Result<Page<Inquiry>, AppError>;

    /// Set the status and stamp its timestamp column if it is still empty.
    async fn transition(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, AppError>;

    /// Hard delete. Returns false when nothing matched.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PostgresInquiryRepository {
    pool: PgPool,
}

impl PostgresInquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InquiryRepositoryTrait for PostgresInquiryRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "inquiries", db.operation = "insert"))]
    async fn create(&self, new: NewInquiry) -> Result<Inquiry, AppError> {
        let inquiry = sqlx::query_as::<Postgres, Inquiry>(
            r#"
            INSERT INTO inquiries (name, email, phone, preferred_contact, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, preferred_contact, message, status,
                      read_at, replied_at, closed_at, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.preferred_contact)
        .bind(&new.message)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(inquiry_id = %inquiry.id, "Inquiry created");
        Ok(inquiry)
    }

    #[tracing::instrument(skip(self), fields(db.table = "inquiries", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<Option<Inquiry>, AppError> {
        let inquiry = sqlx::query_as::<Postgres, Inquiry>(
            r#"
            SELECT id, name, email, phone, preferred_contact, message, status,
                   read_at, replied_at, closed_at, created_at, updated_at
            FROM inquiries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inquiry)
    }

    #[tracing::instrument(skip(self), fields(db.table = "inquiries", db.operation = "select"))]
    async fn list(&self, page: PageRequest) -> Result<Page<Inquiry>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inquiries")
            .fetch_one(&self.pool)
            .await?;

        let inquiries = sqlx::query_as::<Postgres, Inquiry>(
            r#"
            SELECT id, name, email, phone, preferred_contact, message, status,
                   read_at, replied_at, closed_at, created_at, updated_at
            FROM inquiries
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(PER_PAGE))
        .bind(page.offset(PER_PAGE))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(inquiries, page, PER_PAGE, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "inquiries", db.operation = "update"))]
    async fn transition(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, AppError> {
        // Column names come from a closed set on the enum, never from input.
        let stamp = status
            .timestamp_column()
            .map(|col| format!(", {col} = COALESCE({col}, NOW())"))
            .unwrap_or_default();

        let sql = format!(
            r#"
            UPDATE inquiries
            SET status = $2, updated_at = NOW(){stamp}
            WHERE id = $1
            RETURNING id, name, email, phone, preferred_contact, message, status,
                      read_at, replied_at, closed_at, created_at, updated_at
            "#
        );

        let inquiry = sqlx::query_as::<Postgres, Inquiry>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inquiry {}", id)))?;

        tracing::info!(inquiry_id = %id, status = %status, "Inquiry status changed");
        Ok(inquiry)
    }

    #[tracing::instrument(skip(self), fields(db.table = "inquiries", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
