// src/models/service_request.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::job::JobPriority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    ConvertedToJob,
    Rejected,
    Closed,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequestPayload {
    pub status: Option<RequestStatus>,
    pub priority: Option<JobPriority>,
}

// --- Pedido de serviço ---
// Aberto por inquilino (com contrato ativo na unidade) ou pelo gestor.
// Convertível em Job; o status vira CONVERTED_TO_JOB na mesma transação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub requested_by_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: JobPriority,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
