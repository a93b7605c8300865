// src/db/dashboard_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;

// Números crus do portfólio de um gestor; a montagem do resumo (inclusive o
// índice de condição) fica no DashboardService.
#[derive(Debug, Clone, Default)]
pub struct PortfolioCounts {
    pub total_properties: i64,
    pub total_units: i64,
    pub occupied_units: i64,
    pub open_jobs: i64,
    pub pending_requests: i64,
    pub avg_severity: Option<f64>,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn portfolio_counts(&self, manager_id: Uuid) -> Result<PortfolioCounts, AppError> {
        // Transação só para um snapshot consistente das contagens
        let mut tx = self.pool.begin().await?;

        let total_properties = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM properties WHERE manager_id = $1",
        )
        .bind(manager_id)
        .fetch_one(&mut *tx)
        .await?;

        let total_units = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM units u \
             JOIN properties p ON p.id = u.property_id WHERE p.manager_id = $1",
        )
        .bind(manager_id)
        .fetch_one(&mut *tx)
        .await?;

        let occupied_units = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM units u \
             JOIN properties p ON p.id = u.property_id \
             WHERE p.manager_id = $1 AND u.status = 'OCCUPIED'",
        )
        .bind(manager_id)
        .fetch_one(&mut *tx)
        .await?;

        let open_jobs = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs j \
             JOIN properties p ON p.id = j.property_id \
             WHERE p.manager_id = $1 AND j.status IN ('OPEN', 'ASSIGNED', 'IN_PROGRESS')",
        )
        .bind(manager_id)
        .fetch_one(&mut *tx)
        .await?;

        let pending_requests = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM service_requests sr \
             JOIN properties p ON p.id = sr.property_id \
             WHERE p.manager_id = $1 AND sr.status = 'PENDING'",
        )
        .bind(manager_id)
        .fetch_one(&mut *tx)
        .await?;

        // Severidade média das vistorias concluídas que registraram severidade
        let avg_severity = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(i.severity)::float8 FROM inspections i \
             JOIN properties p ON p.id = i.property_id \
             WHERE p.manager_id = $1 AND i.status = 'COMPLETED' AND i.severity IS NOT NULL",
        )
        .bind(manager_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PortfolioCounts {
            total_properties,
            total_units,
            occupied_units,
            open_jobs,
            pending_requests,
            avg_severity,
        })
    }
}
