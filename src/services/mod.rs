//! Domain services.
//!
//! Each service owns one slice of the facility model and talks to the store
//! through the `FacilityStore` trait. The area and neighbor services are the
//! sole owners of the bookkeeping that keeps neighbor edges symmetric; the
//! equipment service only reads the graph to gate placement writes.

pub mod area;
pub mod equipment;
pub mod error;
pub mod maintenance;
pub mod models;
pub mod neighbor;
pub mod part;
pub mod plant;

pub use area::AreaService;
pub use equipment::EquipmentService;
pub use error::{DomainError, DomainResult};
pub use maintenance::MaintenanceService;
pub use neighbor::NeighborService;
pub use part::PartService;
pub use plant::PlantService;
