// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let property_routes = Router::new()
        .route(
            "/",
            get(handlers::properties::list_properties).post(handlers::properties::create_property),
        )
        .route(
            "/{id}",
            get(handlers::properties::get_property)
                .patch(handlers::properties::update_property)
                .delete(handlers::properties::delete_property),
        )
        .route("/{id}/owners", post(handlers::properties::assign_owner))
        .route(
            "/{id}/owners/{owner_id}",
            axum::routing::delete(handlers::properties::remove_owner),
        );

    let unit_routes = Router::new()
        .route("/", get(handlers::units::list_units).post(handlers::units::create_unit))
        .route(
            "/{id}",
            get(handlers::units::get_unit)
                .patch(handlers::units::update_unit)
                .delete(handlers::units::delete_unit),
        )
        .route("/{id}/tenants", post(handlers::units::assign_tenant))
        .route(
            "/{id}/tenants/{tenant_id}",
            axum::routing::delete(handlers::units::remove_tenant),
        );

    let job_routes = Router::new()
        .route("/", get(handlers::jobs::list_jobs).post(handlers::jobs::create_job))
        .route(
            "/{id}",
            get(handlers::jobs::get_job)
                .patch(handlers::jobs::update_job)
                .delete(handlers::jobs::delete_job),
        );

    let inspection_routes = Router::new()
        .route(
            "/",
            get(handlers::inspections::list_inspections)
                .post(handlers::inspections::create_inspection),
        )
        .route(
            "/{id}",
            get(handlers::inspections::get_inspection)
                .patch(handlers::inspections::update_inspection)
                .delete(handlers::inspections::delete_inspection),
        )
        .route("/{id}/complete", post(handlers::inspections::complete_inspection));

    let service_request_routes = Router::new()
        .route(
            "/",
            get(handlers::service_requests::list_service_requests)
                .post(handlers::service_requests::create_service_request),
        )
        .route(
            "/{id}",
            get(handlers::service_requests::get_service_request)
                .patch(handlers::service_requests::update_service_request)
                .delete(handlers::service_requests::delete_service_request),
        )
        .route(
            "/{id}/convert-to-job",
            post(handlers::service_requests::convert_to_job),
        );

    let notification_routes =
        Router::new().route("/", get(handlers::notifications::list_notifications));

    let dashboard_routes = Router::new().route("/summary", get(handlers::dashboard::get_summary));

    // Tudo que não é /auth passa pelo guard de JWT
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/properties", property_routes)
        .nest("/units", unit_routes)
        .nest("/jobs", job_routes)
        .nest("/inspections", inspection_routes)
        .nest("/service-requests", service_request_routes)
        .nest("/notifications", notification_routes)
        .nest("/dashboard", dashboard_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
