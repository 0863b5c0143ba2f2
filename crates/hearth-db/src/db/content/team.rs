use hearth_core::models::{NewTeamMember, Page, PageRequest, TeamMember, TeamMemberUpdate, PER_PAGE};
use hearth_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait TeamRepositoryTrait: Send + Sync {
    async fn create(&self, new: NewTeamMember) -> Result<TeamMember, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<TeamMember>, AppError>;

    async fn list(&self, page: PageRequest) -> Result<Page<TeamMember>, AppError>;

    /// Active members in display order: `sort_order`, then name.
    async fn list_active(&self) -> Result<Vec<TeamMember>, AppError>;

    async fn update(
        &self,
        id: Uuid,
        update: TeamMemberUpdate,
    ) -> Result<Option<TeamMember>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TeamRepositoryTrait for PostgresTeamRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "team_members", db.operation = "insert"))]
    async fn create(&self, new: NewTeamMember) -> Result<TeamMember, AppError> {
        let member = sqlx::query_as::<Postgres, TeamMember>(
            r#"
            INSERT INTO team_members (name, position, bio, photo, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, position, bio, photo, sort_order, is_active, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.position)
        .bind(&new.bio)
        .bind(&new.photo)
        .bind(new.sort_order)
        .bind(new.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    #[tracing::instrument(skip(self), fields(db.table = "team_members", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<Option<TeamMember>, AppError> {
        let member = sqlx::query_as::<Postgres, TeamMember>(
            r#"
            SELECT id, name, position, bio, photo, sort_order, is_active, created_at, updated_at
            FROM team_members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    #[tracing::instrument(skip(self), fields(db.table = "team_members", db.operation = "select"))]
    async fn list(&self, page: PageRequest) -> Result<Page<TeamMember>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team_members")
            .fetch_one(&self.pool)
            .await?;

        let members = sqlx::query_as::<Postgres, TeamMember>(
            r#"
            SELECT id, name, position, bio, photo, sort_order, is_active, created_at, updated_at
            FROM team_members
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(PER_PAGE))
        .bind(page.offset(PER_PAGE))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(members, page, PER_PAGE, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "team_members", db.operation = "select"))]
    async fn list_active(&self) -> Result<Vec<TeamMember>, AppError> {
        let members = sqlx::query_as::<Postgres, TeamMember>(
            r#"
            SELECT id, name, position, bio, photo, sort_order, is_active, created_at, updated_at
            FROM team_members
            WHERE is_active
            ORDER BY sort_order ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "team_members", db.operation = "update"))]
    async fn update(
        &self,
        id: Uuid,
        update: TeamMemberUpdate,
    ) -> Result<Option<TeamMember>, AppError> {
        // bio is nullable: $4 says whether to touch it, $5 is the new value.
        let member = sqlx::query_as::<Postgres, TeamMember>(
            r#"
            UPDATE team_members
            SET name = COALESCE($2, name),
                position = COALESCE($3, position),
                bio = CASE WHEN $4 THEN $5 ELSE bio END,
                sort_order = COALESCE($6, sort_order),
                is_active = COALESCE($7, is_active),
                photo = COALESCE($8, photo),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, position, bio, photo, sort_order, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.position)
        .bind(update.bio.is_some())
        .bind(update.bio.clone().flatten())
        .bind(update.sort_order)
        .bind(update.is_active)
        .bind(&update.photo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    #[tracing::instrument(skip(self), fields(db.table = "team_members", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
