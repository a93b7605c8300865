// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{
        auth::{User, UserRole},
        dashboard::DashboardSummary,
    },
};

// Índice de condição do portfólio (PCI): 0-100 a partir da severidade média
// das vistorias concluídas (0 = sem problemas, 4 = crítico). Sem vistorias
// com severidade registrada, o índice é 100.
pub fn condition_index(avg_severity: Option<f64>) -> i32 {
    match avg_severity {
        None => 100,
        Some(avg) => (100.0 - 25.0 * avg).round().clamp(0.0, 100.0) as i32,
    }
}

#[derive(Clone)]
pub struct DashboardService {
    dashboard_repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(dashboard_repo: DashboardRepository) -> Self {
        Self { dashboard_repo }
    }

    pub async fn summary(&self, user: &User) -> Result<DashboardSummary, AppError> {
        if user.role != UserRole::PropertyManager {
            return Err(AppError::forbidden("Only property managers can view the dashboard"));
        }

        let counts = self.dashboard_repo.portfolio_counts(user.id).await?;

        Ok(DashboardSummary {
            total_properties: counts.total_properties,
            total_units: counts.total_units,
            occupied_units: counts.occupied_units,
            open_jobs: counts.open_jobs,
            pending_requests: counts.pending_requests,
            condition_index: condition_index(counts.avg_severity),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_portfolio_scores_one_hundred() {
        assert_eq!(condition_index(None), 100);
        assert_eq!(condition_index(Some(0.0)), 100);
    }

    #[test]
    fn all_critical_scores_zero() {
        assert_eq!(condition_index(Some(4.0)), 0);
    }

    #[test]
    fn index_scales_linearly_and_stays_clamped() {
        assert_eq!(condition_index(Some(1.0)), 75);
        assert_eq!(condition_index(Some(2.5)), 38);
        // Valores fora da escala não estouram os limites
        assert_eq!(condition_index(Some(10.0)), 0);
        assert_eq!(condition_index(Some(-1.0)), 100);
    }
}
