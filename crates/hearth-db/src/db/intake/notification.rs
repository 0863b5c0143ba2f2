use hearth_core::models::{Notification, NotificationPayload, Page, PageRequest, PER_PAGE};
use hearth_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Staff notification persistence
#[async_trait::async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    /// One row per recipient, all carrying the same payload.
    async fn create_for_recipients(
        &self,
        payload: &NotificationPayload,
        recipients: &[Uuid],
    ) -> Result<Vec<Notification>, AppError>;

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Notification>, AppError>;

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, AppError>;

    /// Mark one of the recipient's notifications read. `None` if it is not theirs.
    async fn mark_read(
        &self,
        recipient_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Notification>, AppError>;

    /// Returns the number of rows changed.
    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl NotificationRepositoryTrait for PostgresNotificationRepository {
    #[tracing::instrument(skip(self, payload, recipients), fields(
        db.table = "notifications",
        db.operation = "insert",
        recipients = recipients.len()
    ))]
    async fn create_for_recipients(
        &self,
        payload: &NotificationPayload,
        recipients: &[Uuid],
    ) -> Result<Vec<Notification>, AppError> {
        if recipients.is_empty() {
            return Ok(Vec::new());
        }

        let notifications = sqlx::query_as::<Postgres, Notification>(
            r#"
            INSERT INTO notifications (notification_type, recipient_id, data)
            SELECT $1, recipient_id, $3
            FROM UNNEST($2::uuid[]) AS recipient_id
            RETURNING id, notification_type, recipient_id, data, read_at, created_at
            "#,
        )
        .bind(payload.type_name())
        .bind(recipients)
        .bind(payload.data())
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    #[tracing::instrument(skip(self), fields(db.table = "notifications", db.operation = "select"))]
    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Notification>, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE recipient_id = $1")
                .bind(recipient_id)
                .fetch_one(&self.pool)
                .await?;

        let notifications = sqlx::query_as::<Postgres, Notification>(
            r#"
            SELECT id, notification_type, recipient_id, data, read_at, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(recipient_id)
        .bind(i64::from(PER_PAGE))
        .bind(page.offset(PER_PAGE))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(notifications, page, PER_PAGE, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "notifications", db.operation = "count"))]
    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND read_at IS NULL",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = "notifications", db.operation = "update"))]
    async fn mark_read(
        &self,
        recipient_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Notification>, AppError> {
        let notification = sqlx::query_as::<Postgres, Notification>(
            r#"
            UPDATE notifications
            SET read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND recipient_id = $2
            RETURNING id, notification_type, recipient_id, data, read_at, created_at
            "#,
        )
        .bind(id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    #[tracing::instrument(skip(self), fields(db.table = "notifications", db.operation = "update"))]
    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() WHERE recipient_id = $1 AND read_at IS NULL",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
