use hearth_core::models::{
    AdmissionInquiry, AdmissionStatus, NewAdmissionInquiry, Page, PageRequest, StatusLifecycle,
    PER_PAGE,
};
use hearth_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const COLUMNS: &str = r#"
    id, title, first_name, last_name, address, phone, email, preferred_contact,
    resident_name, resident_gender, resident_address, resident_date_of_birth, relationship,
    care_service, medical_conditions, special_needs,
    needs_mobility_assistance, needs_medication_assistance, needs_bathing_assistance,
    has_feeding_tube, move_in_timeline, preferred_tour_date, preferred_tour_time,
    how_found_us, additional_info, status,
    read_at, in_progress_at, tour_scheduled_at, admitted_at, declined_at, closed_at,
    created_at, updated_at
"#;

/// Admission inquiry persistence
#[async_trait::async_trait]
pub trait AdmissionRepositoryTrait: Send + Sync {
    async fn create(&self, new: NewAdmissionInquiry) -> Result<AdmissionInquiry, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<AdmissionInquiry>, AppError>;

    async fn list(&self, page: PageRequest) -> Result<Page<AdmissionInquiry>, AppError>;

    async fn transition(
        &self,
        id: Uuid,
        status: AdmissionStatus,
    ) -> Result<AdmissionInquiry, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PostgresAdmissionRepository {
    pool: PgPool,
}

impl PostgresAdmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AdmissionRepositoryTrait for PostgresAdmissionRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "admission_inquiries", db.operation = "insert"))]
    async fn create(&self, new: NewAdmissionInquiry) -> Result<AdmissionInquiry, AppError> {
        let sql = format!(
            r#"
            INSERT INTO admission_inquiries (
                title, first_name, last_name, address, phone, email, preferred_contact,
                resident_name, resident_gender, resident_address, resident_date_of_birth,
                relationship, care_service, medical_conditions, special_needs,
                needs_mobility_assistance, needs_medication_assistance, needs_bathing_assistance,
                has_feeding_tube, move_in_timeline, preferred_tour_date, preferred_tour_time,
                how_found_us, additional_info
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24)
            RETURNING {COLUMNS}
            "#
        );

        let admission = sqlx::query_as::<Postgres, AdmissionInquiry>(&sql)
            .bind(new.title)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.address)
            .bind(&new.phone)
            .bind(&new.email)
            .bind(new.preferred_contact)
            .bind(&new.resident_name)
            .bind(new.resident_gender)
            .bind(&new.resident_address)
            .bind(new.resident_date_of_birth)
            .bind(&new.relationship)
            .bind(&new.care_service)
            .bind(&new.medical_conditions)
            .bind(&new.special_needs)
            .bind(new.needs_mobility_assistance)
            .bind(new.needs_medication_assistance)
            .bind(new.needs_bathing_assistance)
            .bind(new.has_feeding_tube)
            .bind(&new.move_in_timeline)
            .bind(new.preferred_tour_date)
            .bind(&new.preferred_tour_time)
            .bind(&new.how_found_us)
            .bind(&new.additional_info)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(admission_inquiry_id = %admission.id, "Admission inquiry created");
        Ok(admission)
    }

    #[tracing::instrument(skip(self), fields(db.table = "admission_inquiries", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<Option<AdmissionInquiry>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM admission_inquiries WHERE id = $1");
        let admission = sqlx::query_as::<Postgres, AdmissionInquiry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admission)
    }

    #[tracing::instrument(skip(self), fields(db.table = "admission_inquiries", db.operation = "select"))]
    async fn list(&self, page: PageRequest) -> Result<Page<AdmissionInquiry>, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admission_inquiries")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM admission_inquiries
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        );
        let admissions = sqlx::query_as::<Postgres, AdmissionInquiry>(&sql)
            .bind(i64::from(PER_PAGE))
            .bind(page.offset(PER_PAGE))
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(admissions, page, PER_PAGE, total))
    }

    #[tracing::instrument(skip(self), fields(db.table = "admission_inquiries", db.operation = "update"))]
    async fn transition(
        &self,
        id: Uuid,
        status: AdmissionStatus,
    ) -> Result<AdmissionInquiry, AppError> {
        let stamp = status
            .timestamp_column()
            .map(|col| format!(", {col} = COALESCE({col}, NOW())"))
            .unwrap_or_default();

        let sql = format!(
            r#"
            UPDATE admission_inquiries
            SET status = $2, updated_at = NOW(){stamp}
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let admission = sqlx::query_as::<Postgres, AdmissionInquiry>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Admission inquiry {}", id)))?;

        tracing::info!(admission_inquiry_id = %id, status = %status, "Admission inquiry status changed");
        Ok(admission)
    }

    #[tracing::instrument(skip(self), fields(db.table = "admission_inquiries", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM admission_inquiries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
