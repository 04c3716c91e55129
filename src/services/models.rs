//! Service-level request payloads and populated response views.
//!
//! Requests deserialize straight from the HTTP body (camelCase wire names;
//! equipment keeps the historical `areaIDs` spelling). Views are store
//! records with their associations loaded.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::models::*;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArea {
    pub name: String,
    pub location_description: String,
    pub plant_id: Uuid,
    #[serde(default)]
    pub neighbor_ids: Vec<Uuid>,
}

/// Partial area update. `neighbor_ids: Some(vec![])` means "remove all
/// neighbors"; `None` leaves the edge list untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaUpdate {
    pub name: Option<String>,
    pub location_description: Option<String>,
    pub plant_id: Option<Uuid>,
    pub neighbor_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEquipment {
    pub name: String,
    pub manufacturer: String,
    pub serial_number: String,
    pub initial_operations_date: NaiveDate,
    #[serde(rename = "areaIDs")]
    pub area_ids: Vec<Uuid>,
}

/// Partial equipment update. An omitted or empty `areaIDs` leaves the
/// placement unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentUpdate {
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub initial_operations_date: Option<NaiveDate>,
    #[serde(rename = "areaIDs", default)]
    pub area_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPart {
    pub name: String,
    #[serde(rename = "type", default)]
    pub part_type: PartType,
    pub manufacturer: String,
    pub serial_number: String,
    pub installation_date: NaiveDate,
    pub equipment_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub part_type: Option<PartType>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub installation_date: Option<NaiveDate>,
    pub equipment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaintenance {
    pub title: String,
    pub description: Option<String>,
    pub frequency_type: FrequencyType,
    #[serde(default)]
    pub frequency_value: i32,
    pub reference_type: ReferenceType,
    pub specific_date: Option<NaiveDate>,
    pub part_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency_type: Option<FrequencyType>,
    pub frequency_value: Option<i32>,
    pub reference_type: Option<ReferenceType>,
    pub specific_date: Option<NaiveDate>,
    pub part_id: Option<Uuid>,
}

// ============================================================================
// Populated views
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PlantDetails {
    #[serde(flatten)]
    pub plant: PlantNode,
    pub areas: Vec<AreaNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquipmentWithParts {
    #[serde(flatten)]
    pub equipment: EquipmentNode,
    pub parts: Vec<PartNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaDetails {
    #[serde(flatten)]
    pub area: AreaNode,
    pub plant: Option<PlantNode>,
    pub equipment: Vec<EquipmentWithParts>,
    pub neighbors: Vec<AreaNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaWithPlant {
    #[serde(flatten)]
    pub area: AreaNode,
    pub plant: Option<PlantNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquipmentDetails {
    #[serde(flatten)]
    pub equipment: EquipmentNode,
    pub areas: Vec<AreaNode>,
    pub parts: Vec<PartNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartDetails {
    #[serde(flatten)]
    pub part: PartNode,
    pub equipment: Option<EquipmentNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceDetails {
    #[serde(flatten)]
    pub maintenance: MaintenanceNode,
    pub part: Option<PartDetails>,
}
