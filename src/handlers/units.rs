// src/handlers/units.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::unit::{Unit, UnitTenant, UpdateUnitPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListUnitsQuery {
    // Filtro opcional por imóvel
    pub property_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Units",
    params(ListUnitsQuery),
    responses((status = 200, description = "Unidades visíveis para o usuário", body = [Unit])),
    security(("api_jwt" = []))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListUnitsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let units = app_state.unit_service.list_for(&user, query.property_id).await?;
    Ok((StatusCode::OK, Json(units)))
}

// ---
// Payload: CreateUnit
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitPayload {
    pub property_id: Uuid,
    #[validate(length(min = 1, message = "Unit number is required."))]
    pub unit_number: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub rent_amount: Option<Decimal>,
}

#[utoipa::path(
    post,
    path = "/api/units",
    tag = "Units",
    request_body = CreateUnitPayload,
    responses((status = 201, description = "Unidade criada", body = Unit)),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let unit = app_state
        .unit_service
        .create(
            &user,
            payload.property_id,
            &payload.unit_number,
            payload.bedrooms,
            payload.bathrooms,
            payload.rent_amount,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    get,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses((status = 200, description = "Unidade", body = Unit)),
    security(("api_jwt" = []))
)]
pub async fn get_unit(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let unit = app_state.unit_service.get(&user, id).await?;
    Ok((StatusCode::OK, Json(unit)))
}

#[utoipa::path(
    patch,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    request_body = UpdateUnitPayload,
    responses((status = 200, description = "Unidade atualizada", body = Unit)),
    security(("api_jwt" = []))
)]
pub async fn update_unit(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    let unit = app_state.unit_service.update(&user, id, &payload).await?;
    Ok((StatusCode::OK, Json(unit)))
}

#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    responses((status = 200, description = "Unidade removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_unit(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.unit_service.delete(&user, id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

// ---
// Payload: AssignTenant (cria o contrato de locação)
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTenantPayload {
    pub tenant_id: Uuid,
    pub lease_start: NaiveDate,
    pub lease_end: NaiveDate,
    pub rent_amount: Decimal,
}

#[utoipa::path(
    post,
    path = "/api/units/{id}/tenants",
    tag = "Units",
    params(("id" = Uuid, Path, description = "ID da unidade")),
    request_body = AssignTenantPayload,
    responses((status = 201, description = "Contrato criado", body = UnitTenant)),
    security(("api_jwt" = []))
)]
pub async fn assign_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lease = app_state
        .unit_service
        .assign_tenant(
            &user,
            id,
            payload.tenant_id,
            payload.lease_start,
            payload.lease_end,
            payload.rent_amount,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(lease)))
}

#[utoipa::path(
    delete,
    path = "/api/units/{id}/tenants/{tenant_id}",
    tag = "Units",
    params(
        ("id" = Uuid, Path, description = "ID da unidade"),
        ("tenant_id" = Uuid, Path, description = "ID do inquilino")
    ),
    responses((status = 200, description = "Contrato encerrado, unidade atualizada", body = Unit)),
    security(("api_jwt" = []))
)]
pub async fn remove_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((id, tenant_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let unit = app_state.unit_service.remove_tenant(&user, id, tenant_id).await?;
    Ok((StatusCode::OK, Json(unit)))
}
