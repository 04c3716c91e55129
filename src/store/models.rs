//! Facility graph records — plants, areas, equipment, parts, maintenance.
//!
//! Wire names follow the JSON contract of the HTTP API (camelCase, with the
//! historical `areaIDs` spelling on equipment payloads kept in the handlers).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Plant
// ============================================================================

/// An industrial facility. Owns a set of areas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantNode {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Area
// ============================================================================

/// A physical subdivision of a plant. Nodes of the topology graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaNode {
    pub id: Uuid,
    pub name: String,
    pub location_description: String,
    pub plant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An area together with its loaded neighbor edge list.
///
/// This is the working-set row the topology algorithms consume. Edge lists are
/// maintained explicitly in both directions by the services; a snapshot only
/// reflects this area's own outgoing list.
#[derive(Debug, Clone)]
pub struct AreaSnapshot {
    pub area: AreaNode,
    pub neighbor_ids: Vec<Uuid>,
}

/// A full replacement of one area's neighbor edge list, applied as part of a
/// batch save together with the back-reference updates of the peer areas.
#[derive(Debug, Clone)]
pub struct NeighborListUpdate {
    pub area_id: Uuid,
    pub neighbor_ids: Vec<Uuid>,
}

// ============================================================================
// Equipment
// ============================================================================

/// A piece of equipment occupying one or more areas.
///
/// The set of areas attached to an equipment instance must induce a connected
/// subgraph of the neighbor graph; that invariant is enforced by the
/// equipment service at write time, never by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentNode {
    pub id: Uuid,
    pub name: String,
    pub manufacturer: String,
    pub serial_number: String,
    pub initial_operations_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Part
// ============================================================================

/// Part category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartType {
    Electric,
    Electronic,
    Mechanical,
    Hydraulical,
}

impl Default for PartType {
    fn default() -> Self {
        PartType::Mechanical
    }
}

/// A part belonging to exactly one equipment instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartNode {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub part_type: PartType,
    pub manufacturer: String,
    pub serial_number: String,
    pub installation_date: NaiveDate,
    pub equipment_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Maintenance
// ============================================================================

/// How a maintenance recurrence interval is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyType {
    Days,
    Weeks,
    Months,
    Years,
    SpecificDate,
}

/// Which date the recurrence interval is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    PartInstallation,
    EquipmentOperation,
}

/// A scheduled (possibly recurring) maintenance for a part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceNode {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub frequency_type: FrequencyType,
    pub frequency_value: i32,
    pub reference_type: ReferenceType,
    pub specific_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub part_id: Uuid,
    pub next_due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
