use hearth_core::models::{NewStaffUser, StaffUser};
use hearth_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait StaffRepositoryTrait: Send + Sync {
    async fn create(&self, new: NewStaffUser) -> Result<StaffUser, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<StaffUser>, AppError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<StaffUser>, AppError>;

    /// Recipients of in-app notifications.
    async fn list_active(&self) -> Result<Vec<StaffUser>, AppError>;

    async fn update_avatar(
        &self,
        id: Uuid,
        avatar: Option<String>,
    ) -> Result<Option<StaffUser>, AppError>;

    async fn set_api_token_hash(&self, id: Uuid, hash: &str) -> Result<bool, AppError>;

    /// Inactive staff cannot authenticate and receive no notifications.
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PostgresStaffRepository {
    pool: PgPool,
}

impl PostgresStaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StaffRepositoryTrait for PostgresStaffRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "staff_users", db.operation = "insert"))]
    async fn create(&self, new: NewStaffUser) -> Result<StaffUser, AppError> {
        let staff = sqlx::query_as::<Postgres, StaffUser>(
            r#"
            INSERT INTO staff_users (name, email, api_token_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, avatar, api_token_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.api_token_hash)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(staff_id = %staff.id, "Staff user created");
        Ok(staff)
    }

    #[tracing::instrument(skip(self), fields(db.table = "staff_users", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<Option<StaffUser>, AppError> {
        let staff = sqlx::query_as::<Postgres, StaffUser>(
            r#"
            SELECT id, name, email, avatar, api_token_hash, is_active, created_at, updated_at
            FROM staff_users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    #[tracing::instrument(skip(self), fields(db.table = "staff_users", db.operation = "select"))]
    async fn get_by_email(&self, email: &str) -> Result<Option<StaffUser>, AppError> {
        let staff = sqlx::query_as::<Postgres, StaffUser>(
            r#"
            SELECT id, name, email, avatar, api_token_hash, is_active, created_at, updated_at
            FROM staff_users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    #[tracing::instrument(skip(self), fields(db.table = "staff_users", db.operation = "select"))]
    async fn list_active(&self) -> Result<Vec<StaffUser>, AppError> {
        let staff = sqlx::query_as::<Postgres, StaffUser>(
            r#"
            SELECT id, name, email, avatar, api_token_hash, is_active, created_at, updated_at
            FROM staff_users
            WHERE is_active
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    #[tracing::instrument(skip(self), fields(db.table = "staff_users", db.operation = "update"))]
    async fn update_avatar(
        &self,
        id: Uuid,
        avatar: Option<String>,
    ) -> Result<Option<StaffUser>, AppError> {
        let staff = sqlx::query_as::<Postgres, StaffUser>(
            r#"
            UPDATE staff_users
            SET avatar = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, avatar, api_token_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&avatar)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    #[tracing::instrument(skip(self, hash), fields(db.table = "staff_users", db.operation = "update"))]
    async fn set_api_token_hash(&self, id: Uuid, hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE staff_users SET api_token_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "staff_users", db.operation = "update"))]
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE staff_users SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(is_active)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
