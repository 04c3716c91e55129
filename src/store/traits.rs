//! `FacilityStore` trait definition
//!
//! Abstract interface over the record store. The Neo4j client implements it
//! for production; `MockFacilityStore` implements it in-memory for tests.
//!
//! Constraint failures surface as typed `StoreError` variants rather than as
//! message text, so the services can translate them into the domain taxonomy
//! without inspecting strings.

use crate::store::models::*;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Store-level error taxonomy.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced record does not exist (cross-reference rule).
    #[error("foreign key violation: {0}")]
    ForeignKey(String),

    /// A uniqueness or data constraint was violated.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A delete was blocked by dependent records.
    #[error("dependent records exist: {0}")]
    Dependency(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Abstract interface for all facility record operations.
///
/// Multi-row writes (`save_neighbor_lists`) are one logical unit but the store
/// is not required to make them atomic; a partial failure can leave the
/// neighbor graph non-symmetric and is reported to the caller as-is.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    // ========================================================================
    // Plant operations
    // ========================================================================

    /// Create a new plant
    async fn create_plant(&self, plant: &PlantNode) -> StoreResult<()>;

    /// Get a plant by ID
    async fn get_plant(&self, id: Uuid) -> StoreResult<Option<PlantNode>>;

    /// List all plants
    async fn list_plants(&self) -> StoreResult<Vec<PlantNode>>;

    /// Update plant fields
    async fn update_plant(
        &self,
        id: Uuid,
        name: Option<String>,
        address: Option<String>,
    ) -> StoreResult<()>;

    /// Delete a plant. Fails with `Dependency` when areas still reference it.
    async fn delete_plant(&self, id: Uuid) -> StoreResult<()>;

    /// List all areas belonging to a plant
    async fn get_plant_areas(&self, plant_id: Uuid) -> StoreResult<Vec<AreaNode>>;

    // ========================================================================
    // Area operations
    // ========================================================================

    /// Create a new area. Fails with `ForeignKey` when the plant is missing.
    async fn create_area(&self, area: &AreaNode) -> StoreResult<()>;

    /// Get an area by ID
    async fn get_area(&self, id: Uuid) -> StoreResult<Option<AreaNode>>;

    /// List all areas
    async fn list_areas(&self) -> StoreResult<Vec<AreaNode>>;

    /// Set-membership lookup: all areas whose id is in `ids`, with their
    /// neighbor edge lists loaded. Input duplicates yield one snapshot each.
    async fn get_areas_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<AreaSnapshot>>;

    /// This area's neighbor edge list
    async fn get_area_neighbor_ids(&self, id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// This area's neighbors as full records
    async fn get_area_neighbors(&self, id: Uuid) -> StoreResult<Vec<AreaNode>>;

    /// Update plain area fields (not the neighbor list)
    async fn update_area_fields(
        &self,
        id: Uuid,
        name: Option<String>,
        location_description: Option<String>,
        plant_id: Option<Uuid>,
    ) -> StoreResult<()>;

    /// Bulk save of neighbor edge lists — one logical unit covering the area
    /// itself plus every peer whose list changed.
    async fn save_neighbor_lists(&self, updates: &[NeighborListUpdate]) -> StoreResult<()>;

    /// Delete an area row. Fails with `Dependency` when equipment is attached.
    async fn delete_area(&self, id: Uuid) -> StoreResult<()>;

    /// Equipment located (at least partly) in this area
    async fn get_area_equipment(&self, id: Uuid) -> StoreResult<Vec<EquipmentNode>>;

    // ========================================================================
    // Equipment operations
    // ========================================================================

    /// Create equipment with its area placement.
    async fn create_equipment(
        &self,
        equipment: &EquipmentNode,
        area_ids: &[Uuid],
    ) -> StoreResult<()>;

    /// Get equipment by ID
    async fn get_equipment(&self, id: Uuid) -> StoreResult<Option<EquipmentNode>>;

    /// List all equipment
    async fn list_equipment(&self) -> StoreResult<Vec<EquipmentNode>>;

    /// Update plain equipment fields
    async fn update_equipment_fields(
        &self,
        id: Uuid,
        name: Option<String>,
        manufacturer: Option<String>,
        serial_number: Option<String>,
        initial_operations_date: Option<NaiveDate>,
    ) -> StoreResult<()>;

    /// Replace the equipment → area association
    async fn set_equipment_areas(&self, id: Uuid, area_ids: &[Uuid]) -> StoreResult<()>;

    /// Areas this equipment occupies
    async fn get_equipment_areas(&self, id: Uuid) -> StoreResult<Vec<AreaNode>>;

    /// Parts belonging to this equipment
    async fn get_equipment_parts(&self, id: Uuid) -> StoreResult<Vec<PartNode>>;

    /// Delete equipment. Fails with `Dependency` when parts still exist.
    async fn delete_equipment(&self, id: Uuid) -> StoreResult<()>;

    // ========================================================================
    // Part operations
    // ========================================================================

    /// Create a part. Fails with `ForeignKey` when the equipment is missing.
    async fn create_part(&self, part: &PartNode) -> StoreResult<()>;

    /// Get a part by ID
    async fn get_part(&self, id: Uuid) -> StoreResult<Option<PartNode>>;

    /// List all parts
    async fn list_parts(&self) -> StoreResult<Vec<PartNode>>;

    /// Update part fields. Fails with `ForeignKey` on a bad equipment id.
    #[allow(clippy::too_many_arguments)]
    async fn update_part_fields(
        &self,
        id: Uuid,
        name: Option<String>,
        part_type: Option<PartType>,
        manufacturer: Option<String>,
        serial_number: Option<String>,
        installation_date: Option<NaiveDate>,
        equipment_id: Option<Uuid>,
    ) -> StoreResult<()>;

    /// Delete a part
    async fn delete_part(&self, id: Uuid) -> StoreResult<()>;

    // ========================================================================
    // Maintenance operations
    // ========================================================================

    /// Create a maintenance record. Fails with `ForeignKey` on a bad part id.
    async fn create_maintenance(&self, maintenance: &MaintenanceNode) -> StoreResult<()>;

    /// Get a maintenance record by ID
    async fn get_maintenance(&self, id: Uuid) -> StoreResult<Option<MaintenanceNode>>;

    /// List all maintenance records
    async fn list_maintenance(&self) -> StoreResult<Vec<MaintenanceNode>>;

    /// Maintenance records that are still open or due after `today`,
    /// ordered by due date ascending.
    async fn list_open_maintenance(&self, today: NaiveDate) -> StoreResult<Vec<MaintenanceNode>>;

    /// Save the full state of an existing maintenance record
    async fn save_maintenance(&self, maintenance: &MaintenanceNode) -> StoreResult<()>;

    /// Delete a maintenance record
    async fn delete_maintenance(&self, id: Uuid) -> StoreResult<()>;
}
