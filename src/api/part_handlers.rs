//! Part endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::handlers::{AppError, FacilityState};
use crate::services::models::{NewPart, PartDetails, PartUpdate};

pub async fn list_parts(
    State(state): State<FacilityState>,
) -> Result<Json<Vec<PartDetails>>, AppError> {
    Ok(Json(state.part_service.find_all().await?))
}

pub async fn get_part(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PartDetails>, AppError> {
    Ok(Json(state.part_service.find_by_id(id).await?))
}

pub async fn create_part(
    State(state): State<FacilityState>,
    Json(req): Json<NewPart>,
) -> Result<Json<PartDetails>, AppError> {
    Ok(Json(state.part_service.create(req).await?))
}

pub async fn update_part(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PartUpdate>,
) -> Result<Json<PartDetails>, AppError> {
    Ok(Json(state.part_service.update(id, req).await?))
}

pub async fn delete_part(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.part_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
