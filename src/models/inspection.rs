// src/models/inspection.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "inspection_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

// --- Vistoria ---
// `severity` (0 = sem problemas ... 4 = crítico) é registrada na conclusão e
// alimenta o índice de condição do imóvel no dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
    pub created_by_id: Uuid,
    pub title: String,
    pub status: InspectionStatus,
    pub scheduled_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub completed_by_id: Option<Uuid>,
    pub findings: Option<String>,
    pub severity: Option<i16>,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Patch de vistoria. O gestor pode tocar qualquer campo; o técnico designado
// só {status, findings, severity, photos}.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInspectionPayload {
    pub title: Option<String>,
    pub status: Option<InspectionStatus>,
    pub assigned_to_id: Option<Uuid>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub findings: Option<String>,
    pub severity: Option<i16>,
    pub photos: Option<Vec<String>>,
}

impl UpdateInspectionPayload {
    pub fn touches_manager_only_fields(&self) -> bool {
        self.title.is_some() || self.assigned_to_id.is_some() || self.scheduled_date.is_some()
    }
}

// Laudo gerado a partir de uma vistoria. Uma vistoria com laudo não pode
// ser excluída.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspectionReport {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
