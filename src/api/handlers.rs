//! API request handlers — shared state, error mapping, health, plants.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::services::models::{NewPlant, PlantDetails, PlantUpdate};
use crate::services::{
    AreaService, DomainError, EquipmentService, MaintenanceService, NeighborService, PartService,
    PlantService,
};

/// Shared server state
pub struct ServerState {
    pub plant_service: PlantService,
    pub area_service: AreaService,
    pub neighbor_service: NeighborService,
    pub equipment_service: EquipmentService,
    pub part_service: PartService,
    pub maintenance_service: MaintenanceService,
}

pub type FacilityState = Arc<ServerState>;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "facility-graph"
    }))
}

// ============================================================================
// Plant handlers
// ============================================================================

pub async fn list_plants(
    State(state): State<FacilityState>,
) -> Result<Json<Vec<PlantDetails>>, AppError> {
    Ok(Json(state.plant_service.find_all().await?))
}

pub async fn get_plant(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlantDetails>, AppError> {
    Ok(Json(state.plant_service.find_by_id(id).await?))
}

pub async fn create_plant(
    State(state): State<FacilityState>,
    Json(req): Json<NewPlant>,
) -> Result<Json<PlantDetails>, AppError> {
    Ok(Json(state.plant_service.create(req).await?))
}

pub async fn update_plant(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PlantUpdate>,
) -> Result<Json<PlantDetails>, AppError> {
    Ok(Json(state.plant_service.update(id, req).await?))
}

pub async fn delete_plant(
    State(state): State<FacilityState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.plant_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Error handling
// ============================================================================

pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::InvalidForeignKey(msg)
            | DomainError::InvalidData(msg)
            | DomainError::DependencyExists(msg) => AppError::BadRequest(msg),
            DomainError::Internal(e) => AppError::Internal(e),
        }
    }
}
