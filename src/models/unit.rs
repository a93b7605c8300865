// src/models/unit.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "unit_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    Available,
    Occupied,
    Maintenance,
    Reserved,
}

// --- Unidade ---
// `unit_number` é único dentro do imóvel: pré-checagem para mensagem amigável
// + constraint UNIQUE no banco para fechar a janela de corrida.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_number: String,
    pub status: UnitStatus,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub rent_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitPayload {
    pub unit_number: Option<String>,
    pub status: Option<UnitStatus>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub rent_amount: Option<Decimal>,
}

// --- Contrato de locação (lease) ---
// Soft-delete: `is_active` vira false, a linha nunca é removida.
// Índice único parcial (unit_id, tenant_id) WHERE is_active garante no máximo
// um contrato ativo por par.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitTenant {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub tenant_id: Uuid,
    pub lease_start: NaiveDate,
    pub lease_end: NaiveDate,
    pub rent_amount: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
