// src/handlers/inspections.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::inspection::{Inspection, UpdateInspectionPayload},
};

#[utoipa::path(
    get,
    path = "/api/inspections",
    tag = "Inspections",
    responses((status = 200, description = "Vistorias visíveis para o usuário", body = [Inspection])),
    security(("api_jwt" = []))
)]
pub async fn list_inspections(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let inspections = app_state.inspection_service.list_for(&user).await?;
    Ok((StatusCode::OK, Json(inspections)))
}

// ---
// Payload: CreateInspection
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInspectionPayload {
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    pub scheduled_date: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/api/inspections",
    tag = "Inspections",
    request_body = CreateInspectionPayload,
    responses((status = 201, description = "Vistoria agendada", body = Inspection)),
    security(("api_jwt" = []))
)]
pub async fn create_inspection(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateInspectionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let inspection = app_state
        .inspection_service
        .create(
            &user,
            payload.property_id,
            payload.unit_id,
            payload.assigned_to_id,
            &payload.title,
            payload.scheduled_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(inspection)))
}

#[utoipa::path(
    get,
    path = "/api/inspections/{id}",
    tag = "Inspections",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    responses((status = 200, description = "Vistoria", body = Inspection)),
    security(("api_jwt" = []))
)]
pub async fn get_inspection(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let inspection = app_state.inspection_service.get(&user, id).await?;
    Ok((StatusCode::OK, Json(inspection)))
}

#[utoipa::path(
    patch,
    path = "/api/inspections/{id}",
    tag = "Inspections",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    request_body = UpdateInspectionPayload,
    responses((status = 200, description = "Vistoria atualizada", body = Inspection)),
    security(("api_jwt" = []))
)]
pub async fn update_inspection(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInspectionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let inspection = app_state.inspection_service.update(&user, id, &payload).await?;
    Ok((StatusCode::OK, Json(inspection)))
}

// ---
// Payload: CompleteInspection (fluxo do técnico)
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteInspectionPayload {
    pub findings: String,
    pub severity: Option<i16>,
    pub photos: Option<Vec<String>>,
}

#[utoipa::path(
    post,
    path = "/api/inspections/{id}/complete",
    tag = "Inspections",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    request_body = CompleteInspectionPayload,
    responses((status = 200, description = "Vistoria concluída", body = Inspection)),
    security(("api_jwt" = []))
)]
pub async fn complete_inspection(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteInspectionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let inspection = app_state
        .inspection_service
        .complete(&user, id, &payload.findings, payload.severity, payload.photos.as_ref())
        .await?;
    Ok((StatusCode::OK, Json(inspection)))
}

#[utoipa::path(
    delete,
    path = "/api/inspections/{id}",
    tag = "Inspections",
    params(("id" = Uuid, Path, description = "ID da vistoria")),
    responses((status = 200, description = "Vistoria removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_inspection(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inspection_service.delete(&user, id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
