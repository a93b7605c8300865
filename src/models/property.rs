// src/models/property.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Imóvel ---
// `total_units` acompanha a contagem viva de unidades; é mantido na MESMA
// transação do create/delete de unidade (ver UnitService).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub manager_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub property_type: String,
    pub total_units: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Patch parcial: só os campos presentes mudam (COALESCE no repositório)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyPayload {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub property_type: Option<String>,
}

// --- Vínculo de proprietário ---
// UNIQUE (property_id, owner_id) no banco; atribuição duplicada vira 400.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOwner {
    pub id: Uuid,
    pub property_id: Uuid,
    pub owner_id: Uuid,
    pub ownership_percentage: Decimal,
    pub created_at: DateTime<Utc>,
}
