// src/handlers/jobs.rs

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
    models::job::{Job, JobPriority, UpdateJobPayload},
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    responses((status = 200, description = "Jobs visíveis para o usuário", body = [Job])),
    security(("api_jwt" = []))
)]
pub async fn list_jobs(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let jobs = app_state.job_service.list_for(&user).await?;
    Ok((StatusCode::OK, Json(jobs)))
}

// ---
// Payload: CreateJob
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
    pub service_request_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    pub description: Option<String>,
    // Sem prioridade explícita, assume MEDIUM
    pub priority: Option<JobPriority>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub estimated_cost: Option<Decimal>,
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Jobs",
    request_body = CreateJobPayload,
    responses((status = 201, description = "Job criado", body = Job)),
    security(("api_jwt" = []))
)]
pub async fn create_job(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let job = app_state
        .job_service
        .create(
            &user,
            payload.property_id,
            payload.unit_id,
            payload.assigned_to_id,
            payload.service_request_id,
            &payload.title,
            payload.description.as_deref(),
            payload.priority.unwrap_or(JobPriority::Medium),
            payload.scheduled_date,
            payload.estimated_cost,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID do job")),
    responses((status = 200, description = "Job", body = Job)),
    security(("api_jwt" = []))
)]
pub async fn get_job(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state.job_service.get(&user, id).await?;
    Ok((StatusCode::OK, Json(job)))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID do job")),
    request_body = UpdateJobPayload,
    responses((status = 200, description = "Job atualizado", body = Job)),
    security(("api_jwt" = []))
)]
pub async fn update_job(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    let job = app_state.job_service.update(&user, id, &payload).await?;
    Ok((StatusCode::OK, Json(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID do job")),
    responses((status = 200, description = "Job removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_job(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.job_service.delete(&user, id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
