// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

// Resumo do portfólio do gestor. `condition_index` é o PCI (0-100), derivado
// das severidades das vistorias concluídas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_properties: i64,
    pub total_units: i64,
    pub occupied_units: i64,
    pub open_jobs: i64,
    pub pending_requests: i64,
    pub condition_index: i32,
}
