// src/db/job_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::job::{Job, JobPriority, JobStatus, UpdateJobPayload},
};

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
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
        service_request_id: Option<Uuid>,
        created_by_id: Uuid,
        title: &str,
        description: Option<&str>,
        status: JobStatus,
        priority: JobPriority,
        scheduled_date: Option<DateTime<Utc>>,
        estimated_cost: Option<Decimal>,
    ) -> Result<Job, AppError> {
        let job = sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (property_id, unit_id, assigned_to_id, service_request_id, \
                               created_by_id, title, description, status, priority, \
                               scheduled_date, estimated_cost) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(property_id)
        .bind(unit_id)
        .bind(assigned_to_id)
        .bind(service_request_id)
        .bind(created_by_id)
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(priority)
        .bind(scheduled_date)
        .bind(estimated_cost)
        .fetch_one(executor)
        .await?;
        Ok(job)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    pub async fn list_for_manager(&self, manager_id: Uuid) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, Job>(
            "SELECT j.* FROM jobs j \
             JOIN properties p ON p.id = j.property_id \
             WHERE p.manager_id = $1 ORDER BY j.created_at DESC",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, Job>(
            "SELECT j.* FROM jobs j \
             JOIN property_owners po ON po.property_id = j.property_id \
             WHERE po.owner_id = $1 ORDER BY j.created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Jobs nas unidades onde o inquilino tem contrato ativo
    pub async fn list_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, Job>(
            "SELECT j.* FROM jobs j \
             JOIN unit_tenants ut ON ut.unit_id = j.unit_id AND ut.is_active \
             WHERE ut.tenant_id = $1 ORDER BY j.created_at DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_technician(&self, technician_id: Uuid) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE assigned_to_id = $1 ORDER BY created_at DESC",
        )
        .bind(technician_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Patch parcial. `completed_date` chega separado: o service decide quando
    // carimbar (status virou COMPLETED e ainda não havia carimbo).
    pub async fn update_partial(
        &self,
        executor: impl PgExecutor<'_>,
        id: Uuid,
        patch: &UpdateJobPayload,
        completed_date: Option<DateTime<Utc>>,
    ) -> Result<Job, AppError> {
        let job = sqlx::query_as::<_, Job>(
            "UPDATE jobs SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                status = COALESCE($4, status), \
                priority = COALESCE($5, priority), \
                assigned_to_id = COALESCE($6, assigned_to_id), \
                scheduled_date = COALESCE($7, scheduled_date), \
                estimated_cost = COALESCE($8, estimated_cost), \
                actual_cost = COALESCE($9, actual_cost), \
                notes = COALESCE($10, notes), \
                photos = COALESCE($11, photos), \
                completed_date = COALESCE($12, completed_date), \
                updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.status)
        .bind(patch.priority)
        .bind(patch.assigned_to_id)
        .bind(patch.scheduled_date)
        .bind(patch.estimated_cost)
        .bind(patch.actual_cost)
        .bind(patch.notes.as_deref())
        .bind(patch.photos.as_ref())
        .bind(completed_date)
        .fetch_one(executor)
        .await?;
        Ok(job)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
