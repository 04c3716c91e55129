//! In-memory `FacilityStore` used by the service unit tests.
//!
//! Enforces the same referential rules as the Neo4j client (typed
//! `ForeignKey` and `Dependency` errors) so the services can be tested
//! without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::models::*;
use crate::store::traits::{FacilityStore, StoreError, StoreResult};

#[derive(Default)]
pub struct MockFacilityStore {
    plants: RwLock<HashMap<Uuid, PlantNode>>,
    areas: RwLock<HashMap<Uuid, AreaNode>>,
    neighbors: RwLock<HashMap<Uuid, Vec<Uuid>>>,
    equipment: RwLock<HashMap<Uuid, EquipmentNode>>,
    equipment_areas: RwLock<HashMap<Uuid, Vec<Uuid>>>,
    parts: RwLock<HashMap<Uuid, PartNode>>,
    maintenance: RwLock<HashMap<Uuid, MaintenanceNode>>,
}

impl MockFacilityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FacilityStore for MockFacilityStore {
    async fn create_plant(&self, plant: &PlantNode) -> StoreResult<()> {
        self.plants.write().await.insert(plant.id, plant.clone());
        Ok(())
    }

    async fn get_plant(&self, id: Uuid) -> StoreResult<Option<PlantNode>> {
        Ok(self.plants.read().await.get(&id).cloned())
    }

    async fn list_plants(&self) -> StoreResult<Vec<PlantNode>> {
        Ok(self.plants.read().await.values().cloned().collect())
    }

    async fn update_plant(
        &self,
        id: Uuid,
        name: Option<String>,
        address: Option<String>,
    ) -> StoreResult<()> {
        let mut plants = self.plants.write().await;
        let plant = plants
            .get_mut(&id)
            .ok_or_else(|| StoreError::ForeignKey(format!("plant {id} does not exist")))?;
        if let Some(name) = name {
            plant.name = name;
        }
        if let Some(address) = address {
            plant.address = address;
        }
        plant.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_plant(&self, id: Uuid) -> StoreResult<()> {
        let has_areas = self
            .areas
            .read()
            .await
            .values()
            .any(|a| a.plant_id == id);
        if has_areas {
            return Err(StoreError::Dependency(format!(
                "plant {id} still has areas"
            )));
        }
        self.plants.write().await.remove(&id);
        Ok(())
    }

    async fn get_plant_areas(&self, plant_id: Uuid) -> StoreResult<Vec<AreaNode>> {
        Ok(self
            .areas
            .read()
            .await
            .values()
            .filter(|a| a.plant_id == plant_id)
            .cloned()
            .collect())
    }

    async fn create_area(&self, area: &AreaNode) -> StoreResult<()> {
        if !self.plants.read().await.contains_key(&area.plant_id) {
            return Err(StoreError::ForeignKey(format!(
                "plant {} does not exist",
                area.plant_id
            )));
        }
        self.areas.write().await.insert(area.id, area.clone());
        self.neighbors.write().await.insert(area.id, Vec::new());
        Ok(())
    }

    async fn get_area(&self, id: Uuid) -> StoreResult<Option<AreaNode>> {
        Ok(self.areas.read().await.get(&id).cloned())
    }

    async fn list_areas(&self) -> StoreResult<Vec<AreaNode>> {
        Ok(self.areas.read().await.values().cloned().collect())
    }

    async fn get_areas_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<AreaSnapshot>> {
        let areas = self.areas.read().await;
        let neighbors = self.neighbors.read().await;
        let mut seen = Vec::new();
        let mut result = Vec::new();
        for id in ids {
            if seen.contains(id) {
                continue;
            }
            seen.push(*id);
            if let Some(area) = areas.get(id) {
                result.push(AreaSnapshot {
                    area: area.clone(),
                    neighbor_ids: neighbors.get(id).cloned().unwrap_or_default(),
                });
            }
        }
        Ok(result)
    }

    async fn get_area_neighbor_ids(&self, id: Uuid) -> StoreResult<Vec<Uuid>> {
        Ok(self.neighbors.read().await.get(&id).cloned().unwrap_or_default())
    }

    async fn get_area_neighbors(&self, id: Uuid) -> StoreResult<Vec<AreaNode>> {
        let ids = self.get_area_neighbor_ids(id).await?;
        let areas = self.areas.read().await;
        Ok(ids.iter().filter_map(|n| areas.get(n).cloned()).collect())
    }

    async fn update_area_fields(
        &self,
        id: Uuid,
        name: Option<String>,
        location_description: Option<String>,
        plant_id: Option<Uuid>,
    ) -> StoreResult<()> {
        if let Some(plant_id) = plant_id {
            if !self.plants.read().await.contains_key(&plant_id) {
                return Err(StoreError::ForeignKey(format!(
                    "plant {plant_id} does not exist"
                )));
            }
        }
        let mut areas = self.areas.write().await;
        let area = areas
            .get_mut(&id)
            .ok_or_else(|| StoreError::ForeignKey(format!("area {id} does not exist")))?;
        if let Some(name) = name {
            area.name = name;
        }
        if let Some(location_description) = location_description {
            area.location_description = location_description;
        }
        if let Some(plant_id) = plant_id {
            area.plant_id = plant_id;
        }
        area.updated_at = Utc::now();
        Ok(())
    }

    async fn save_neighbor_lists(&self, updates: &[NeighborListUpdate]) -> StoreResult<()> {
        let mut neighbors = self.neighbors.write().await;
        for update in updates {
            neighbors.insert(update.area_id, update.neighbor_ids.clone());
        }
        Ok(())
    }

    async fn delete_area(&self, id: Uuid) -> StoreResult<()> {
        let occupied = self
            .equipment_areas
            .read()
            .await
            .values()
            .any(|ids| ids.contains(&id));
        if occupied {
            return Err(StoreError::Dependency(format!(
                "area {id} still has equipment"
            )));
        }
        self.areas.write().await.remove(&id);
        self.neighbors.write().await.remove(&id);
        Ok(())
    }

    async fn get_area_equipment(&self, id: Uuid) -> StoreResult<Vec<EquipmentNode>> {
        let equipment_areas = self.equipment_areas.read().await;
        let equipment = self.equipment.read().await;
        Ok(equipment_areas
            .iter()
            .filter(|(_, areas)| areas.contains(&id))
            .filter_map(|(eq_id, _)| equipment.get(eq_id).cloned())
            .collect())
    }

    async fn create_equipment(
        &self,
        equipment: &EquipmentNode,
        area_ids: &[Uuid],
    ) -> StoreResult<()> {
        let areas = self.areas.read().await;
        for area_id in area_ids {
            if !areas.contains_key(area_id) {
                return Err(StoreError::ForeignKey(format!(
                    "area {area_id} does not exist"
                )));
            }
        }
        drop(areas);
        self.equipment
            .write()
            .await
            .insert(equipment.id, equipment.clone());
        self.equipment_areas
            .write()
            .await
            .insert(equipment.id, area_ids.to_vec());
        Ok(())
    }

    async fn get_equipment(&self, id: Uuid) -> StoreResult<Option<EquipmentNode>> {
        Ok(self.equipment.read().await.get(&id).cloned())
    }

    async fn list_equipment(&self) -> StoreResult<Vec<EquipmentNode>> {
        Ok(self.equipment.read().await.values().cloned().collect())
    }

    async fn update_equipment_fields(
        &self,
        id: Uuid,
        name: Option<String>,
        manufacturer: Option<String>,
        serial_number: Option<String>,
        initial_operations_date: Option<NaiveDate>,
    ) -> StoreResult<()> {
        let mut equipment = self.equipment.write().await;
        let eq = equipment
            .get_mut(&id)
            .ok_or_else(|| StoreError::ForeignKey(format!("equipment {id} does not exist")))?;
        if let Some(name) = name {
            eq.name = name;
        }
        if let Some(manufacturer) = manufacturer {
            eq.manufacturer = manufacturer;
        }
        if let Some(serial_number) = serial_number {
            eq.serial_number = serial_number;
        }
        if let Some(date) = initial_operations_date {
            eq.initial_operations_date = date;
        }
        eq.updated_at = Utc::now();
        Ok(())
    }

    async fn set_equipment_areas(&self, id: Uuid, area_ids: &[Uuid]) -> StoreResult<()> {
        self.equipment_areas
            .write()
            .await
            .insert(id, area_ids.to_vec());
        Ok(())
    }

    async fn get_equipment_areas(&self, id: Uuid) -> StoreResult<Vec<AreaNode>> {
        let ids = self
            .equipment_areas
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default();
        let areas = self.areas.read().await;
        Ok(ids.iter().filter_map(|a| areas.get(a).cloned()).collect())
    }

    async fn get_equipment_parts(&self, id: Uuid) -> StoreResult<Vec<PartNode>> {
        Ok(self
            .parts
            .read()
            .await
            .values()
            .filter(|p| p.equipment_id == id)
            .cloned()
            .collect())
    }

    async fn delete_equipment(&self, id: Uuid) -> StoreResult<()> {
        let has_parts = self
            .parts
            .read()
            .await
            .values()
            .any(|p| p.equipment_id == id);
        if has_parts {
            return Err(StoreError::Dependency(format!(
                "equipment {id} still has parts"
            )));
        }
        self.equipment.write().await.remove(&id);
        self.equipment_areas.write().await.remove(&id);
        Ok(())
    }

    async fn create_part(&self, part: &PartNode) -> StoreResult<()> {
        if !self.equipment.read().await.contains_key(&part.equipment_id) {
            return Err(StoreError::ForeignKey(format!(
                "equipment {} does not exist",
                part.equipment_id
            )));
        }
        self.parts.write().await.insert(part.id, part.clone());
        Ok(())
    }

    async fn get_part(&self, id: Uuid) -> StoreResult<Option<PartNode>> {
        Ok(self.parts.read().await.get(&id).cloned())
    }

    async fn list_parts(&self) -> StoreResult<Vec<PartNode>> {
        Ok(self.parts.read().await.values().cloned().collect())
    }

    async fn update_part_fields(
        &self,
        id: Uuid,
        name: Option<String>,
        part_type: Option<PartType>,
        manufacturer: Option<String>,
        serial_number: Option<String>,
        installation_date: Option<NaiveDate>,
        equipment_id: Option<Uuid>,
    ) -> StoreResult<()> {
        if let Some(equipment_id) = equipment_id {
            if !self.equipment.read().await.contains_key(&equipment_id) {
                return Err(StoreError::ForeignKey(format!(
                    "equipment {equipment_id} does not exist"
                )));
            }
        }
        let mut parts = self.parts.write().await;
        let part = parts
            .get_mut(&id)
            .ok_or_else(|| StoreError::ForeignKey(format!("part {id} does not exist")))?;
        if let Some(name) = name {
            part.name = name;
        }
        if let Some(part_type) = part_type {
            part.part_type = part_type;
        }
        if let Some(manufacturer) = manufacturer {
            part.manufacturer = manufacturer;
        }
        if let Some(serial_number) = serial_number {
            part.serial_number = serial_number;
        }
        if let Some(installation_date) = installation_date {
            part.installation_date = installation_date;
        }
        if let Some(equipment_id) = equipment_id {
            part.equipment_id = equipment_id;
        }
        part.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_part(&self, id: Uuid) -> StoreResult<()> {
        self.parts.write().await.remove(&id);
        Ok(())
    }

    async fn create_maintenance(&self, maintenance: &MaintenanceNode) -> StoreResult<()> {
        if !self.parts.read().await.contains_key(&maintenance.part_id) {
            return Err(StoreError::ForeignKey(format!(
                "part {} does not exist",
                maintenance.part_id
            )));
        }
        self.maintenance
            .write()
            .await
            .insert(maintenance.id, maintenance.clone());
        Ok(())
    }

    async fn get_maintenance(&self, id: Uuid) -> StoreResult<Option<MaintenanceNode>> {
        Ok(self.maintenance.read().await.get(&id).cloned())
    }

    async fn list_maintenance(&self) -> StoreResult<Vec<MaintenanceNode>> {
        Ok(self.maintenance.read().await.values().cloned().collect())
    }

    async fn list_open_maintenance(&self, today: NaiveDate) -> StoreResult<Vec<MaintenanceNode>> {
        let mut records: Vec<MaintenanceNode> = self
            .maintenance
            .read()
            .await
            .values()
            .filter(|m| !m.is_completed || m.next_due_date.is_some_and(|d| d > today))
            .cloned()
            .collect();
        records.sort_by_key(|m| m.next_due_date);
        Ok(records)
    }

    async fn save_maintenance(&self, maintenance: &MaintenanceNode) -> StoreResult<()> {
        self.maintenance
            .write()
            .await
            .insert(maintenance.id, maintenance.clone());
        Ok(())
    }

    async fn delete_maintenance(&self, id: Uuid) -> StoreResult<()> {
        self.maintenance.write().await.remove(&id);
        Ok(())
    }
}

/// Record builders and graph helpers shared by the service tests.
pub mod fixtures {
    use super::*;

    pub fn plant(name: &str) -> PlantNode {
        let now = Utc::now();
        PlantNode {
            id: Uuid::new_v4(),
            name: name.into(),
            address: "1 Mill Rd".into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn area(plant_id: Uuid, name: &str) -> AreaNode {
        let now = Utc::now();
        AreaNode {
            id: Uuid::new_v4(),
            name: name.into(),
            location_description: format!("{name} location"),
            plant_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn equipment(name: &str) -> EquipmentNode {
        let now = Utc::now();
        EquipmentNode {
            id: Uuid::new_v4(),
            name: name.into(),
            manufacturer: "Demag".into(),
            serial_number: format!("{name}-001"),
            initial_operations_date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn part(equipment_id: Uuid, name: &str) -> PartNode {
        let now = Utc::now();
        PartNode {
            id: Uuid::new_v4(),
            name: name.into(),
            part_type: PartType::Mechanical,
            manufacturer: "SKF".into(),
            serial_number: format!("{name}-001"),
            installation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            equipment_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a symmetric neighbor edge between two existing areas.
    pub async fn link(store: &MockFacilityStore, a: Uuid, b: Uuid) {
        let mut a_list = store.get_area_neighbor_ids(a).await.unwrap();
        let mut b_list = store.get_area_neighbor_ids(b).await.unwrap();
        if !a_list.contains(&b) {
            a_list.push(b);
        }
        if !b_list.contains(&a) {
            b_list.push(a);
        }
        store
            .save_neighbor_lists(&[
                NeighborListUpdate {
                    area_id: a,
                    neighbor_ids: a_list,
                },
                NeighborListUpdate {
                    area_id: b,
                    neighbor_ids: b_list,
                },
            ])
            .await
            .unwrap();
    }
}
