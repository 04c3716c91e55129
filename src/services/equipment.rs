//! Equipment service.
//!
//! Placement writes are gated by the topology rule: the areas attached to a
//! piece of equipment must form a connected group of neighbors. The check runs
//! against the induced subgraph of the requested areas only, so a path through
//! an area outside the set does not count.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::graph::is_connected;
use crate::services::error::{DomainError, DomainResult};
use crate::services::models::{EquipmentDetails, EquipmentUpdate, NewEquipment};
use crate::store::models::{AreaSnapshot, EquipmentNode};
use crate::store::{FacilityStore, StoreError};

pub struct EquipmentService {
    store: Arc<dyn FacilityStore>,
}

impl EquipmentService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> DomainResult<Vec<EquipmentDetails>> {
        let mut result = Vec::new();
        for equipment in self.store.list_equipment().await? {
            result.push(self.load_details(equipment).await?);
        }
        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DomainResult<EquipmentDetails> {
        let equipment = self
            .store
            .get_equipment(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Equipment not found".into()))?;
        self.load_details(equipment).await
    }

    pub async fn create(&self, req: NewEquipment) -> DomainResult<EquipmentDetails> {
        self.validate_area_set(&req.area_ids).await?;

        let now = Utc::now();
        let equipment = EquipmentNode {
            id: Uuid::new_v4(),
            name: req.name,
            manufacturer: req.manufacturer,
            serial_number: req.serial_number,
            initial_operations_date: req.initial_operations_date,
            created_at: now,
            updated_at: now,
        };
        self.store.create_equipment(&equipment, &req.area_ids).await?;
        self.load_details(equipment).await
    }

    pub async fn update(&self, id: Uuid, req: EquipmentUpdate) -> DomainResult<EquipmentDetails> {
        self.store
            .get_equipment(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Equipment not found".into()))?;

        // Omitted or empty areaIDs keeps the current placement
        if let Some(area_ids) = req.area_ids.as_deref() {
            if !area_ids.is_empty() {
                self.validate_area_set(area_ids).await?;
                self.store.set_equipment_areas(id, area_ids).await?;
            }
        }

        if req.name.is_some()
            || req.manufacturer.is_some()
            || req.serial_number.is_some()
            || req.initial_operations_date.is_some()
        {
            self.store
                .update_equipment_fields(
                    id,
                    req.name,
                    req.manufacturer,
                    req.serial_number,
                    req.initial_operations_date,
                )
                .await?;
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.store
            .get_equipment(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Equipment not found".into()))?;

        match self.store.delete_equipment(id).await {
            Ok(()) => Ok(()),
            Err(StoreError::Dependency(_) | StoreError::Constraint(_)) => {
                Err(DomainError::DependencyExists(
                    "Cannot delete equipment with associated parts".into(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the requested area ids and enforce the placement rule.
    async fn validate_area_set(&self, area_ids: &[Uuid]) -> DomainResult<Vec<AreaSnapshot>> {
        if area_ids.is_empty() {
            return Err(DomainError::InvalidData(
                "Equipment must be associated with at least one area".into(),
            ));
        }

        let snapshots = self.store.get_areas_by_ids(area_ids).await?;
        if snapshots.len() != area_ids.len() {
            return Err(DomainError::InvalidData(
                "One or more area IDs are invalid".into(),
            ));
        }

        if !is_connected(&snapshots) {
            return Err(DomainError::InvalidData(
                "All areas associated with an equipment must form a connected group of neighbors"
                    .into(),
            ));
        }

        Ok(snapshots)
    }

    async fn load_details(&self, equipment: EquipmentNode) -> DomainResult<EquipmentDetails> {
        let areas = self.store.get_equipment_areas(equipment.id).await?;
        let parts = self.store.get_equipment_parts(equipment.id).await?;
        Ok(EquipmentDetails {
            equipment,
            areas,
            parts,
        })
    }
}
