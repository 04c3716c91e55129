//! Area and neighbor endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::handlers::{AppError, FacilityState};
use crate::services::models::{AreaDetails, AreaUpdate, AreaWithPlant, NewArea};

pub async fn list_areas(
    State(state): State<FacilityState>,
) -> Result<Json<Vec<AreaDetails>>, AppError> {
    Ok(Json(state.area_service.find_all().await?))
}

pub async fn get_area(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AreaDetails>, AppError> {
    Ok(Json(state.area_service.find_by_id(id).await?))
}

pub async fn create_area(
    State(state): State<FacilityState>,
    Json(req): Json<NewArea>,
) -> Result<Json<AreaDetails>, AppError> {
    Ok(Json(state.area_service.create(req).await?))
}

pub async fn update_area(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AreaUpdate>,
) -> Result<Json<AreaDetails>, AppError> {
    Ok(Json(state.area_service.update(id, req).await?))
}

pub async fn delete_area(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.area_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Neighbor edges
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborRequest {
    pub neighbor_ids: Vec<Uuid>,
}

pub async fn get_neighbors(
    State(state): State<FacilityState>,
    Path(area_id): Path<Uuid>,
) -> Result<Json<Vec<AreaWithPlant>>, AppError> {
    Ok(Json(state.neighbor_service.get_neighbors(area_id).await?))
}

pub async fn add_neighbors(
    State(state): State<FacilityState>,
    Path(area_id): Path<Uuid>,
    Json(req): Json<NeighborRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    state
        .neighbor_service
        .add_neighbor(area_id, &req.neighbor_ids)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Neighbors added successfully" })),
    ))
}

pub async fn remove_neighbors(
    State(state): State<FacilityState>,
    Path(area_id): Path<Uuid>,
    Json(req): Json<NeighborRequest>,
) -> Result<StatusCode, AppError> {
    state
        .neighbor_service
        .remove_neighbor(area_id, &req.neighbor_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
