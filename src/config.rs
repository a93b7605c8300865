// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        DashboardRepository, InspectionRepository, JobRepository, NotificationRepository,
        PropertyRepository, ServiceRequestRepository, SubscriptionRepository, UnitRepository,
        UserRepository,
    },
    services::{
        access::AccessService, auth::AuthService, dashboard_service::DashboardService,
        inspection_service::InspectionService, job_service::JobService,
        property_service::PropertyService, service_request_service::ServiceRequestService,
        subscription_service::SubscriptionService, unit_service::UnitService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub property_service: PropertyService,
    pub unit_service: UnitService,
    pub job_service: JobService,
    pub inspection_service: InspectionService,
    pub service_request_service: ServiceRequestService,
    pub dashboard_service: DashboardService,
    pub notification_repo: NotificationRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;

        // Um único pool, injetado em todos os repositórios
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let property_repo = PropertyRepository::new(db_pool.clone());
        let unit_repo = UnitRepository::new(db_pool.clone());
        let job_repo = JobRepository::new(db_pool.clone());
        let inspection_repo = InspectionRepository::new(db_pool.clone());
        let service_request_repo = ServiceRequestRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());
        let subscription_repo = SubscriptionRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let access = AccessService::new(property_repo.clone(), unit_repo.clone());
        let subscriptions = SubscriptionService::new(user_repo.clone(), subscription_repo);

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone());
        let property_service = PropertyService::new(
            property_repo.clone(),
            user_repo.clone(),
            access.clone(),
            subscriptions,
        );
        let unit_service = UnitService::new(
            unit_repo.clone(),
            property_repo.clone(),
            user_repo,
            notification_repo.clone(),
            access.clone(),
            db_pool.clone(),
        );
        let job_service = JobService::new(
            job_repo,
            property_repo.clone(),
            service_request_repo.clone(),
            notification_repo.clone(),
            access.clone(),
            db_pool.clone(),
        );
        let inspection_service = InspectionService::new(
            inspection_repo,
            property_repo.clone(),
            notification_repo.clone(),
            access,
            db_pool.clone(),
        );
        let service_request_service =
            ServiceRequestService::new(service_request_repo, property_repo, unit_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            property_service,
            unit_service,
            job_service,
            inspection_service,
            service_request_service,
            dashboard_service,
            notification_repo,
        })
    }
}
