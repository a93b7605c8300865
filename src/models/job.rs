// src/models/job.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Os valores são restritos ao enum, mas as TRANSIÇÕES não são vigiadas
// (qualquer status válido é aceito num update). Decisão registrada no DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobPriority {
    Low,
    Medium,
    High,
    Urgent,
}

// Patch de job. O gestor pode tocar qualquer campo; o técnico designado só
// {status, notes, photos, actual_cost}. A checagem fica no JobService.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
    pub priority: Option<JobPriority>,
    pub assigned_to_id: Option<Uuid>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub photos: Option<Vec<String>>,
}

impl UpdateJobPayload {
    // Campos que um técnico designado NÃO pode tocar
    pub fn touches_manager_only_fields(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.priority.is_some()
            || self.assigned_to_id.is_some()
            || self.scheduled_date.is_some()
            || self.estimated_cost.is_some()
    }
}

// --- Ordem de serviço ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
    // Pedido de serviço que originou este job, quando houver
    pub service_request_id: Option<Uuid>,
    pub created_by_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
    pub notes: Option<String>,
    // Evidências (URLs de fotos) anexadas pelo técnico
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
