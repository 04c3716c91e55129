//! Area service — CRUD plus neighbor edge bookkeeping.
//!
//! Every mutation path that touches the neighbor graph updates both sides of
//! each edge and saves all touched rows as one batch, so the symmetry
//! invariant holds whenever an operation completes successfully.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::graph::neighbor_diff;
use crate::services::error::{DomainError, DomainResult};
use crate::services::models::{AreaDetails, AreaUpdate, EquipmentWithParts, NewArea};
use crate::store::models::{AreaNode, NeighborListUpdate};
use crate::store::{FacilityStore, StoreError};

pub struct AreaService {
    store: Arc<dyn FacilityStore>,
}

impl AreaService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    /// All areas with plant, equipment (with parts) and neighbors populated.
    pub async fn find_all(&self) -> DomainResult<Vec<AreaDetails>> {
        let areas = self.store.list_areas().await?;
        let mut details = Vec::with_capacity(areas.len());
        for area in areas {
            details.push(self.load_details(area).await?);
        }
        Ok(details)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DomainResult<AreaDetails> {
        let area = self
            .store
            .get_area(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Area not found".into()))?;
        self.load_details(area).await
    }

    /// Create an area, optionally with an initial neighbor list.
    ///
    /// The initial neighbors are wired symmetrically in the same batch save.
    /// Unlike `update`, creation does not verify that the chosen neighbors
    /// belong to the same plant — historical behavior, kept as-is.
    pub async fn create(&self, data: NewArea) -> DomainResult<AreaDetails> {
        self.store
            .get_plant(data.plant_id)
            .await?
            .ok_or_else(|| DomainError::InvalidForeignKey("Invalid plant ID".into()))?;

        let neighbor_snapshots = if data.neighbor_ids.is_empty() {
            Vec::new()
        } else {
            let snapshots = self.store.get_areas_by_ids(&data.neighbor_ids).await?;
            if snapshots.len() != data.neighbor_ids.len() {
                return Err(DomainError::NotFound(
                    "One or more neighbor areas not found".into(),
                ));
            }
            snapshots
        };

        let now = Utc::now();
        let area = AreaNode {
            id: Uuid::new_v4(),
            name: data.name,
            location_description: data.location_description,
            plant_id: data.plant_id,
            created_at: now,
            updated_at: now,
        };
        self.store.create_area(&area).await?;

        if !neighbor_snapshots.is_empty() {
            let mut updates = vec![NeighborListUpdate {
                area_id: area.id,
                neighbor_ids: data.neighbor_ids.clone(),
            }];
            for snapshot in &neighbor_snapshots {
                if !snapshot.neighbor_ids.contains(&area.id) {
                    let mut list = snapshot.neighbor_ids.clone();
                    list.push(area.id);
                    updates.push(NeighborListUpdate {
                        area_id: snapshot.area.id,
                        neighbor_ids: list,
                    });
                }
            }
            self.store.save_neighbor_lists(&updates).await?;
        }

        self.load_details(area).await
    }

    /// Partial update. A provided neighbor list (including the empty list,
    /// meaning "remove all") fully replaces the current one; both sides of
    /// every added or removed edge are updated in the same batch.
    pub async fn update(&self, id: Uuid, data: AreaUpdate) -> DomainResult<AreaDetails> {
        let area = self
            .store
            .get_area(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Area not found".into()))?;

        let effective_plant_id = match data.plant_id {
            Some(plant_id) => {
                self.store
                    .get_plant(plant_id)
                    .await?
                    .ok_or_else(|| DomainError::InvalidForeignKey("Invalid plant ID".into()))?;
                plant_id
            }
            None => area.plant_id,
        };

        if let Some(requested) = &data.neighbor_ids {
            self.replace_neighbors(id, effective_plant_id, requested)
                .await?;
        }

        if data.name.is_some() || data.location_description.is_some() || data.plant_id.is_some() {
            self.store
                .update_area_fields(id, data.name, data.location_description, data.plant_id)
                .await?;
        }

        self.find_by_id(id).await
    }

    /// Delete an area: verify nothing blocks the delete, strip the area from
    /// every neighbor's edge list, then remove the row. A blocked delete
    /// leaves the adjacency untouched.
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.store
            .get_area(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Area not found".into()))?;

        // Dependency check before any graph mutation
        if !self.store.get_area_equipment(id).await?.is_empty() {
            return Err(DomainError::DependencyExists(
                "Cannot delete area with associated equipment".into(),
            ));
        }

        let neighbor_ids = self.store.get_area_neighbor_ids(id).await?;
        if !neighbor_ids.is_empty() {
            let mut updates = vec![NeighborListUpdate {
                area_id: id,
                neighbor_ids: Vec::new(),
            }];
            for snapshot in self.store.get_areas_by_ids(&neighbor_ids).await? {
                if snapshot.neighbor_ids.contains(&id) {
                    updates.push(NeighborListUpdate {
                        area_id: snapshot.area.id,
                        neighbor_ids: snapshot
                            .neighbor_ids
                            .into_iter()
                            .filter(|n| *n != id)
                            .collect(),
                    });
                }
            }
            self.store.save_neighbor_lists(&updates).await?;
        }

        self.store.delete_area(id).await.map_err(|err| match err {
            StoreError::Dependency(_) | StoreError::Constraint(_) => DomainError::DependencyExists(
                "Cannot delete area with associated equipment".into(),
            ),
            other => other.into(),
        })
    }

    /// Full replacement of one area's neighbor list.
    async fn replace_neighbors(
        &self,
        id: Uuid,
        plant_id: Uuid,
        requested: &[Uuid],
    ) -> DomainResult<()> {
        let requested_snapshots = if requested.is_empty() {
            Vec::new()
        } else {
            self.store.get_areas_by_ids(requested).await?
        };
        if requested_snapshots.len() != requested.len() {
            return Err(DomainError::NotFound(
                "One or more neighbor areas not found".into(),
            ));
        }

        for snapshot in &requested_snapshots {
            if snapshot.area.id == id {
                return Err(DomainError::InvalidData(
                    "An area cannot be a neighbor of itself".into(),
                ));
            }
        }

        let current = self.store.get_area_neighbor_ids(id).await?;
        let diff = neighbor_diff(&current, requested);
        let to_add: HashSet<Uuid> = diff.to_add.iter().copied().collect();

        // The same-plant rule applies to new edges only; edges that already
        // exist may be kept or removed regardless of plant
        for snapshot in &requested_snapshots {
            if to_add.contains(&snapshot.area.id) && snapshot.area.plant_id != plant_id {
                return Err(DomainError::InvalidForeignKey(
                    "Neighboring areas must belong to the same plant".into(),
                ));
            }
        }

        let mut updates = Vec::new();

        // Removed peers lose their back-reference to this area
        if !diff.to_remove.is_empty() {
            for snapshot in self.store.get_areas_by_ids(&diff.to_remove).await? {
                if snapshot.neighbor_ids.contains(&id) {
                    updates.push(NeighborListUpdate {
                        area_id: snapshot.area.id,
                        neighbor_ids: snapshot
                            .neighbor_ids
                            .into_iter()
                            .filter(|n| *n != id)
                            .collect(),
                    });
                }
            }
        }

        // Added peers gain a back-reference, idempotently
        for snapshot in &requested_snapshots {
            if to_add.contains(&snapshot.area.id) && !snapshot.neighbor_ids.contains(&id) {
                let mut list = snapshot.neighbor_ids.clone();
                list.push(id);
                updates.push(NeighborListUpdate {
                    area_id: snapshot.area.id,
                    neighbor_ids: list,
                });
            }
        }

        // This area's list becomes exactly the requested set
        updates.push(NeighborListUpdate {
            area_id: id,
            neighbor_ids: requested.to_vec(),
        });

        self.store.save_neighbor_lists(&updates).await?;
        Ok(())
    }

    async fn load_details(&self, area: AreaNode) -> DomainResult<AreaDetails> {
        let plant = self.store.get_plant(area.plant_id).await?;
        let neighbors = self.store.get_area_neighbors(area.id).await?;
        let mut equipment = Vec::new();
        for item in self.store.get_area_equipment(area.id).await? {
            let parts = self.store.get_equipment_parts(item.id).await?;
            equipment.push(EquipmentWithParts {
                equipment: item,
                parts,
            });
        }
        Ok(AreaDetails {
            area,
            plant,
            equipment,
            neighbors,
        })
    }
}
