//! HTTP API for the facility graph service

pub mod area_handlers;
pub mod equipment_handlers;
pub mod handlers;
pub mod maintenance_handlers;
pub mod part_handlers;
pub mod routes;

pub use handlers::{AppError, FacilityState, ServerState};
pub use routes::create_router;
