// src/db/inspection_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inspection::{Inspection, InspectionStatus, UpdateInspectionPayload},
};

#[derive(Clone)]
pub struct InspectionRepository {
    pool: PgPool,
}

impl InspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        executor: impl PgExecutor<'_>,
        property_id: Uuid,
        unit_id: Option<Uuid>,
        assigned_to_id: Option<Uuid>,
        created_by_id: Uuid,
        title: &str,
        scheduled_date: DateTime<Utc>,
    ) -> Result<Inspection, AppError> {
        let inspection = sqlx::query_as::<_, Inspection>(
            "INSERT INTO inspections (property_id, unit_id, assigned_to_id, created_by_id, \
                                      title, scheduled_date) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(property_id)
        .bind(unit_id)
        .bind(assigned_to_id)
        .bind(created_by_id)
        .bind(title)
        .bind(scheduled_date)
        .fetch_one(executor)
        .await?;
        Ok(inspection)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Inspection>, AppError> {
        let inspection = sqlx::query_as::<_, Inspection>("SELECT * FROM inspections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(inspection)
    }

    pub async fn list_for_manager(&self, manager_id: Uuid) -> Result<Vec<Inspection>, AppError> {
        let rows = sqlx::query_as::<_, Inspection>(
            "SELECT i.* FROM inspections i \
             JOIN properties p ON p.id = i.property_id \
             WHERE p.manager_id = $1 ORDER BY i.scheduled_date DESC",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Inspection>, AppError> {
        let rows = sqlx::query_as::<_, Inspection>(
            "SELECT i.* FROM inspections i \
             JOIN property_owners po ON po.property_id = i.property_id \
             WHERE po.owner_id = $1 ORDER BY i.scheduled_date DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Inspection>, AppError> {
        let rows = sqlx::query_as::<_, Inspection>(
            "SELECT i.* FROM inspections i \
             JOIN unit_tenants ut ON ut.unit_id = i.unit_id AND ut.is_active \
             WHERE ut.tenant_id = $1 ORDER BY i.scheduled_date DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_technician(
        &self,
        technician_id: Uuid,
    ) -> Result<Vec<Inspection>, AppError> {
        let rows = sqlx::query_as::<_, Inspection>(
            "SELECT * FROM inspections WHERE assigned_to_id = $1 ORDER BY scheduled_date DESC",
        )
        .bind(technician_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Existe outra vistoria SCHEDULED/IN_PROGRESS na mesma unidade dentro da
    // janela [from, to)? `exclude` pula a própria vistoria num reagendamento.
    pub async fn has_conflicting(
        &self,
        unit_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inspections \
             WHERE unit_id = $1 \
               AND status IN ('SCHEDULED', 'IN_PROGRESS') \
               AND scheduled_date > $2 AND scheduled_date < $3 \
               AND ($4::uuid IS NULL OR id <> $4))",
        )
        .bind(unit_id)
        .bind(from)
        .bind(to)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn update_partial(
        &self,
        executor: impl PgExecutor<'_>,
        id: Uuid,
        patch: &UpdateInspectionPayload,
        completed_date: Option<DateTime<Utc>>,
    ) -> Result<Inspection, AppError> {
        let inspection = sqlx::query_as::<_, Inspection>(
            "UPDATE inspections SET \
                title = COALESCE($2, title), \
                status = COALESCE($3, status), \
                assigned_to_id = COALESCE($4, assigned_to_id), \
                scheduled_date = COALESCE($5, scheduled_date), \
                findings = COALESCE($6, findings), \
                severity = COALESCE($7, severity), \
                photos = COALESCE($8, photos), \
                completed_date = COALESCE($9, completed_date), \
                updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.status)
        .bind(patch.assigned_to_id)
        .bind(patch.scheduled_date)
        .bind(patch.findings.as_deref())
        .bind(patch.severity)
        .bind(patch.photos.as_ref())
        .bind(completed_date)
        .fetch_one(executor)
        .await?;
        Ok(inspection)
    }

    // Conclusão pelo técnico: carimba data, autor e severidade de uma vez
    #[allow(clippy::too_many_arguments)]
    pub async fn complete(
        &self,
        executor: impl PgExecutor<'_>,
        id: Uuid,
        completed_by_id: Uuid,
        findings: &str,
        severity: Option<i16>,
        photos: Option<&Vec<String>>,
    ) -> Result<Inspection, AppError> {
        let inspection = sqlx::query_as::<_, Inspection>(
            "UPDATE inspections SET \
                status = $2, \
                findings = $3, \
                severity = COALESCE($4, severity), \
                photos = COALESCE($5, photos), \
                completed_date = COALESCE(completed_date, now()), \
                completed_by_id = $6, \
                updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(InspectionStatus::Completed)
        .bind(findings)
        .bind(severity)
        .bind(photos)
        .bind(completed_by_id)
        .fetch_one(executor)
        .await?;
        Ok(inspection)
    }

    pub async fn has_report(&self, inspection_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inspection_reports WHERE inspection_id = $1)",
        )
        .bind(inspection_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM inspections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
