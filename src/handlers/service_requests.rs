// src/handlers/service_requests.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        job::{Job, JobPriority},
        service_request::{ServiceRequest, UpdateServiceRequestPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/service-requests",
    tag = "Service Requests",
    responses((status = 200, description = "Pedidos visíveis para o usuário", body = [ServiceRequest])),
    security(("api_jwt" = []))
)]
pub async fn list_service_requests(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let requests = app_state.service_request_service.list_for(&user).await?;
    Ok((StatusCode::OK, Json(requests)))
}

// ---
// Payload: CreateServiceRequest
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequestPayload {
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<JobPriority>,
}

#[utoipa::path(
    post,
    path = "/api/service-requests",
    tag = "Service Requests",
    request_body = CreateServiceRequestPayload,
    responses((status = 201, description = "Pedido aberto", body = ServiceRequest)),
    security(("api_jwt" = []))
)]
pub async fn create_service_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateServiceRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let request = app_state
        .service_request_service
        .create(
            &user,
            payload.property_id,
            payload.unit_id,
            &payload.title,
            payload.description.as_deref(),
            payload.priority.unwrap_or(JobPriority::Medium),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/service-requests/{id}",
    tag = "Service Requests",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses((status = 200, description = "Pedido", body = ServiceRequest)),
    security(("api_jwt" = []))
)]
pub async fn get_service_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let request = app_state.service_request_service.get(&user, id).await?;
    Ok((StatusCode::OK, Json(request)))
}

#[utoipa::path(
    patch,
    path = "/api/service-requests/{id}",
    tag = "Service Requests",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = UpdateServiceRequestPayload,
    responses((status = 200, description = "Pedido atualizado", body = ServiceRequest)),
    security(("api_jwt" = []))
)]
pub async fn update_service_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    let request = app_state.service_request_service.update(&user, id, &payload).await?;
    Ok((StatusCode::OK, Json(request)))
}

#[utoipa::path(
    delete,
    path = "/api/service-requests/{id}",
    tag = "Service Requests",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses((status = 200, description = "Pedido removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_service_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.service_request_service.delete(&user, id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

// ---
// Payload: ConvertToJob
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertToJobPayload {
    pub assigned_to_id: Option<Uuid>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub estimated_cost: Option<Decimal>,
}

#[utoipa::path(
    post,
    path = "/api/service-requests/{id}/convert-to-job",
    tag = "Service Requests",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = ConvertToJobPayload,
    responses((status = 201, description = "Job criado a partir do pedido", body = Job)),
    security(("api_jwt" = []))
)]
pub async fn convert_to_job(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConvertToJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state
        .job_service
        .create_from_request(
            &user,
            id,
            payload.assigned_to_id,
            payload.scheduled_date,
            payload.estimated_cost,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(job)))
}
