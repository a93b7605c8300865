// src/db/service_request_repo.rs

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        job::JobPriority,
        service_request::{RequestStatus, ServiceRequest, UpdateServiceRequestPayload},
    },
};

#[derive(Clone)]
pub struct ServiceRequestRepository {
    pool: PgPool,
}

impl ServiceRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        property_id: Uuid,
        unit_id: Option<Uuid>,
        requested_by_id: Uuid,
        title: &str,
        description: Option<&str>,
        priority: JobPriority,
    ) -> Result<ServiceRequest, AppError> {
        let request = sqlx::query_as::<_, ServiceRequest>(
            "INSERT INTO service_requests (property_id, unit_id, requested_by_id, title, \
                                           description, priority) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(property_id)
        .bind(unit_id)
        .bind(requested_by_id)
        .bind(title)
        .bind(description)
        .bind(priority)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceRequest>, AppError> {
        let request =
            sqlx::query_as::<_, ServiceRequest>("SELECT * FROM service_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(request)
    }

    pub async fn list_for_requester(
        &self,
        requester_id: Uuid,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        let rows = sqlx::query_as::<_, ServiceRequest>(
            "SELECT * FROM service_requests WHERE requested_by_id = $1 ORDER BY created_at DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_manager(&self, manager_id: Uuid) -> Result<Vec<ServiceRequest>, AppError> {
        let rows = sqlx::query_as::<_, ServiceRequest>(
            "SELECT sr.* FROM service_requests sr \
             JOIN properties p ON p.id = sr.property_id \
             WHERE p.manager_id = $1 ORDER BY sr.created_at DESC",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ServiceRequest>, AppError> {
        let rows = sqlx::query_as::<_, ServiceRequest>(
            "SELECT sr.* FROM service_requests sr \
             JOIN property_owners po ON po.property_id = sr.property_id \
             WHERE po.owner_id = $1 ORDER BY sr.created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_partial(
        &self,
        id: Uuid,
        patch: &UpdateServiceRequestPayload,
    ) -> Result<ServiceRequest, AppError> {
        let request = sqlx::query_as::<_, ServiceRequest>(
            "UPDATE service_requests SET \
                status = COALESCE($2, status), \
                priority = COALESCE($3, priority), \
                updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.status)
        .bind(patch.priority)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    // Na mesma transação que insere o Job originado do pedido
    pub async fn set_status(
        &self,
        executor: impl PgExecutor<'_>,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE service_requests SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM service_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
