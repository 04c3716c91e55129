//! Equipment endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::handlers::{AppError, FacilityState};
use crate::services::models::{EquipmentDetails, EquipmentUpdate, NewEquipment};

pub async fn list_equipment(
    State(state): State<FacilityState>,
) -> Result<Json<Vec<EquipmentDetails>>, AppError> {
    Ok(Json(state.equipment_service.find_all().await?))
}

pub async fn get_equipment(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EquipmentDetails>, AppError> {
    Ok(Json(state.equipment_service.find_by_id(id).await?))
}

pub async fn create_equipment(
    State(state): State<FacilityState>,
    Json(req): Json<NewEquipment>,
) -> Result<Json<EquipmentDetails>, AppError> {
    Ok(Json(state.equipment_service.create(req).await?))
}

pub async fn update_equipment(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EquipmentUpdate>,
) -> Result<Json<EquipmentDetails>, AppError> {
    Ok(Json(state.equipment_service.update(id, req).await?))
}

pub async fn delete_equipment(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.equipment_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
