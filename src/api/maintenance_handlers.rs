//! Maintenance endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::handlers::{AppError, FacilityState};
use crate::services::models::{MaintenanceDetails, MaintenanceUpdate, NewMaintenance};

pub async fn list_maintenance(
    State(state): State<FacilityState>,
) -> Result<Json<Vec<MaintenanceDetails>>, AppError> {
    Ok(Json(state.maintenance_service.find_all().await?))
}

pub async fn list_future_maintenance(
    State(state): State<FacilityState>,
) -> Result<Json<Vec<MaintenanceDetails>>, AppError> {
    Ok(Json(state.maintenance_service.find_all_future().await?))
}

pub async fn get_maintenance(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaintenanceDetails>, AppError> {
    Ok(Json(state.maintenance_service.find_by_id(id).await?))
}

pub async fn create_maintenance(
    State(state): State<FacilityState>,
    Json(req): Json<NewMaintenance>,
) -> Result<Json<MaintenanceDetails>, AppError> {
    Ok(Json(state.maintenance_service.create(req).await?))
}

pub async fn update_maintenance(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MaintenanceUpdate>,
) -> Result<Json<MaintenanceDetails>, AppError> {
    Ok(Json(state.maintenance_service.update(id, req).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub completed_date: Option<NaiveDate>,
}

pub async fn complete_maintenance(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
    body: Option<Json<CompleteRequest>>,
) -> Result<Json<MaintenanceDetails>, AppError> {
    let completed_date = body.and_then(|Json(req)| req.completed_date);
    Ok(Json(
        state
            .maintenance_service
            .mark_complete(id, completed_date)
            .await?,
    ))
}

pub async fn delete_maintenance(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.maintenance_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
