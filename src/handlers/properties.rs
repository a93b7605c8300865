// src/handlers/properties.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
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
    models::property::{Property, PropertyOwner, UpdatePropertyPayload},
};

// ---
// Payload: CreateProperty
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "Address is required."))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required."))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required."))]
    pub state: String,
    #[validate(length(min = 1, message = "Zip code is required."))]
    pub zip_code: String,
    #[validate(length(min = 1, message = "Property type is required."))]
    pub property_type: String,
}

#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Properties",
    responses((status = 200, description = "Imóveis visíveis para o usuário", body = [Property])),
    security(("api_jwt" = []))
)]
pub async fn list_properties(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let properties = app_state.property_service.list_for(&user).await?;
    Ok((StatusCode::OK, Json(properties)))
}

#[utoipa::path(
    post,
    path = "/api/properties",
    tag = "Properties",
    request_body = CreatePropertyPayload,
    responses((status = 201, description = "Imóvel criado", body = Property)),
    security(("api_jwt" = []))
)]
pub async fn create_property(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreatePropertyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let property = app_state
        .property_service
        .create(
            &user,
            &payload.name,
            &payload.address,
            &payload.city,
            &payload.state,
            &payload.zip_code,
            &payload.property_type,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(property)))
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do imóvel")),
    responses((status = 200, description = "Imóvel", body = Property)),
    security(("api_jwt" = []))
)]
pub async fn get_property(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let property = app_state.property_service.get(&user, id).await?;
    Ok((StatusCode::OK, Json(property)))
}

#[utoipa::path(
    patch,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do imóvel")),
    request_body = UpdatePropertyPayload,
    responses((status = 200, description = "Imóvel atualizado", body = Property)),
    security(("api_jwt" = []))
)]
pub async fn update_property(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePropertyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let property = app_state.property_service.update(&user, id, &payload).await?;
    Ok((StatusCode::OK, Json(property)))
}

#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do imóvel")),
    responses((status = 200, description = "Imóvel removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_property(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.property_service.delete(&user, id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

// ---
// Payload: AssignOwner
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignOwnerPayload {
    pub owner_id: Uuid,
    // Opcional: sem valor, assume 100%
    pub ownership_percentage: Option<Decimal>,
}

#[utoipa::path(
    post,
    path = "/api/properties/{id}/owners",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do imóvel")),
    request_body = AssignOwnerPayload,
    responses((status = 201, description = "Proprietário vinculado", body = PropertyOwner)),
    security(("api_jwt" = []))
)]
pub async fn assign_owner(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignOwnerPayload>,
) -> Result<impl IntoResponse, AppError> {
    let owner = app_state
        .property_service
        .assign_owner(&user, id, payload.owner_id, payload.ownership_percentage)
        .await?;
    Ok((StatusCode::CREATED, Json(owner)))
}

#[utoipa::path(
    delete,
    path = "/api/properties/{id}/owners/{owner_id}",
    tag = "Properties",
    params(
        ("id" = Uuid, Path, description = "ID do imóvel"),
        ("owner_id" = Uuid, Path, description = "ID do proprietário")
    ),
    responses((status = 200, description = "Vínculo removido")),
    security(("api_jwt" = []))
)]
pub async fn remove_owner(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((id, owner_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state.property_service.remove_owner(&user, id, owner_id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
