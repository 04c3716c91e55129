//! API route definitions

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::area_handlers;
use super::equipment_handlers;
use super::handlers::{self, FacilityState};
use super::maintenance_handlers;
use super::part_handlers;

/// Create the API router
pub fn create_router(state: FacilityState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // ====================================================================
        // Plants
        // ====================================================================
        .route(
            "/plants",
            get(handlers::list_plants).post(handlers::create_plant),
        )
        .route(
            "/plants/{id}",
            get(handlers::get_plant)
                .put(handlers::update_plant)
                .delete(handlers::delete_plant),
        )
        // ====================================================================
        // Areas + neighbor edges
        // ====================================================================
        .route(
            "/areas",
            get(area_handlers::list_areas).post(area_handlers::create_area),
        )
        .route(
            "/areas/{id}",
            get(area_handlers::get_area)
                .put(area_handlers::update_area)
                .delete(area_handlers::delete_area),
        )
        .route(
            "/neighbors/{area_id}",
            get(area_handlers::get_neighbors)
                .post(area_handlers::add_neighbors)
                .delete(area_handlers::remove_neighbors),
        )
        // ====================================================================
        // Equipment
        // ====================================================================
        .route(
            "/equipment",
            get(equipment_handlers::list_equipment).post(equipment_handlers::create_equipment),
        )
        .route(
            "/equipment/{id}",
            get(equipment_handlers::get_equipment)
                .put(equipment_handlers::update_equipment)
                .delete(equipment_handlers::delete_equipment),
        )
        // ====================================================================
        // Parts
        // ====================================================================
        .route(
            "/parts",
            get(part_handlers::list_parts).post(part_handlers::create_part),
        )
        .route(
            "/parts/{id}",
            get(part_handlers::get_part)
                .put(part_handlers::update_part)
                .delete(part_handlers::delete_part),
        )
        // ====================================================================
        // Maintenance
        // ====================================================================
        .route(
            "/maintenance",
            get(maintenance_handlers::list_maintenance)
                .post(maintenance_handlers::create_maintenance),
        )
        .route(
            "/maintenance/future",
            get(maintenance_handlers::list_future_maintenance),
        )
        .route(
            "/maintenance/{id}",
            get(maintenance_handlers::get_maintenance)
                .put(maintenance_handlers::update_maintenance)
                .delete(maintenance_handlers::delete_maintenance),
        )
        .route(
            "/maintenance/{id}/complete",
            put(maintenance_handlers::complete_maintenance),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
