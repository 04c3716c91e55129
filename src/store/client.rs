//! Neo4j-backed `FacilityStore`.
//!
//! Graph layout:
//!   (:Area)-[:IN_PLANT]->(:Plant)
//!   (:Area)-[:NEIGHBOR_OF]->(:Area)      maintained in both directions
//!   (:Equipment)-[:LOCATED_IN]->(:Area)
//!   (:Part)-[:PART_OF]->(:Equipment)
//!   (:Maintenance)-[:FOR_PART]->(:Part)
//!
//! Reads of the neighbor graph follow outgoing NEIGHBOR_OF edges only; the
//! services write both directions in one batch. Referential rules (missing
//! foreign node, blocked delete) are checked with explicit existence queries
//! and reported as typed `StoreError` variants.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use neo4rs::{query, Graph};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::store::models::*;
use crate::store::traits::{FacilityStore, StoreError, StoreResult};

pub struct Neo4jFacilityStore {
    graph: Arc<Graph>,
}

impl From<neo4rs::Error> for StoreError {
    fn from(err: neo4rs::Error) -> Self {
        StoreError::Other(anyhow::Error::new(err))
    }
}

/// Wire form of a unit enum (its serde string).
fn enum_to_str<T: Serialize>(value: &T) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::String(s) => Ok(s),
        other => anyhow::bail!("expected string-encoded enum, got {other}"),
    }
}

fn enum_from_str<T: DeserializeOwned>(s: String) -> anyhow::Result<T> {
    Ok(serde_json::from_value(Value::String(s))?)
}

fn node_to_plant(node: &neo4rs::Node) -> anyhow::Result<PlantNode> {
    Ok(PlantNode {
        id: node.get::<String>("id")?.parse()?,
        name: node.get("name")?,
        address: node.get("address")?,
        created_at: node.get::<String>("created_at")?.parse()?,
        updated_at: node.get::<String>("updated_at")?.parse()?,
    })
}

fn node_to_area(node: &neo4rs::Node) -> anyhow::Result<AreaNode> {
    Ok(AreaNode {
        id: node.get::<String>("id")?.parse()?,
        name: node.get("name")?,
        location_description: node.get("location_description")?,
        plant_id: node.get::<String>("plant_id")?.parse()?,
        created_at: node.get::<String>("created_at")?.parse()?,
        updated_at: node.get::<String>("updated_at")?.parse()?,
    })
}

fn node_to_equipment(node: &neo4rs::Node) -> anyhow::Result<EquipmentNode> {
    Ok(EquipmentNode {
        id: node.get::<String>("id")?.parse()?,
        name: node.get("name")?,
        manufacturer: node.get("manufacturer")?,
        serial_number: node.get("serial_number")?,
        initial_operations_date: node.get::<String>("initial_operations_date")?.parse()?,
        created_at: node.get::<String>("created_at")?.parse()?,
        updated_at: node.get::<String>("updated_at")?.parse()?,
    })
}

fn node_to_part(node: &neo4rs::Node) -> anyhow::Result<PartNode> {
    Ok(PartNode {
        id: node.get::<String>("id")?.parse()?,
        name: node.get("name")?,
        part_type: enum_from_str(node.get::<String>("part_type")?)?,
        manufacturer: node.get("manufacturer")?,
        serial_number: node.get("serial_number")?,
        installation_date: node.get::<String>("installation_date")?.parse()?,
        equipment_id: node.get::<String>("equipment_id")?.parse()?,
        created_at: node.get::<String>("created_at")?.parse()?,
        updated_at: node.get::<String>("updated_at")?.parse()?,
    })
}

fn node_to_maintenance(node: &neo4rs::Node) -> anyhow::Result<MaintenanceNode> {
    Ok(MaintenanceNode {
        id: node.get::<String>("id")?.parse()?,
        title: node.get("title")?,
        description: node
            .get::<String>("description")
            .ok()
            .filter(|s| !s.is_empty()),
        frequency_type: enum_from_str(node.get::<String>("frequency_type")?)?,
        frequency_value: node.get::<i64>("frequency_value")? as i32,
        reference_type: enum_from_str(node.get::<String>("reference_type")?)?,
        specific_date: node
            .get::<String>("specific_date")
            .ok()
            .and_then(|s| s.parse().ok()),
        is_completed: node.get("is_completed")?,
        completed_date: node
            .get::<String>("completed_date")
            .ok()
            .and_then(|s| s.parse().ok()),
        part_id: node.get::<String>("part_id")?.parse()?,
        next_due_date: node
            .get::<String>("next_due_date")
            .ok()
            .and_then(|s| s.parse().ok()),
        created_at: node.get::<String>("created_at")?.parse()?,
        updated_at: node.get::<String>("updated_at")?.parse()?,
    })
}

fn date_param(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

impl Neo4jFacilityStore {
    pub async fn new(uri: &str, user: &str, password: &str) -> anyhow::Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let store = Self {
            graph: Arc::new(graph),
        };
        store.init_schema().await?;
        Ok(store)
    }

    /// Initialize constraints and indexes.
    async fn init_schema(&self) -> anyhow::Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT plant_id IF NOT EXISTS FOR (p:Plant) REQUIRE p.id IS UNIQUE",
            "CREATE CONSTRAINT area_id IF NOT EXISTS FOR (a:Area) REQUIRE a.id IS UNIQUE",
            "CREATE CONSTRAINT equipment_id IF NOT EXISTS FOR (e:Equipment) REQUIRE e.id IS UNIQUE",
            "CREATE CONSTRAINT part_id IF NOT EXISTS FOR (p:Part) REQUIRE p.id IS UNIQUE",
            "CREATE CONSTRAINT maintenance_id IF NOT EXISTS FOR (m:Maintenance) REQUIRE m.id IS UNIQUE",
        ];

        let indexes = vec![
            "CREATE INDEX area_plant IF NOT EXISTS FOR (a:Area) ON (a.plant_id)",
            "CREATE INDEX part_equipment IF NOT EXISTS FOR (p:Part) ON (p.equipment_id)",
            "CREATE INDEX maintenance_part IF NOT EXISTS FOR (m:Maintenance) ON (m.part_id)",
            "CREATE INDEX maintenance_due IF NOT EXISTS FOR (m:Maintenance) ON (m.next_due_date)",
        ];

        for constraint in constraints {
            if let Err(e) = self.graph.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }

        for index in indexes {
            if let Err(e) = self.graph.run(query(index)).await {
                tracing::warn!("Index may already exist: {}", e);
            }
        }

        Ok(())
    }

    /// `true` when a node with `label` and `id` exists.
    async fn node_exists(&self, label: &str, id: Uuid) -> StoreResult<bool> {
        let cypher = format!("MATCH (n:{label} {{id: $id}}) RETURN count(n) AS cnt");
        let q = query(&cypher).param("id", id.to_string());
        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let cnt: i64 = row.get("cnt").map_err(anyhow::Error::new)?;
            Ok(cnt > 0)
        } else {
            Ok(false)
        }
    }

    async fn count(&self, cypher: &str, id: Uuid) -> StoreResult<i64> {
        let q = query(cypher).param("id", id.to_string());
        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            Ok(row.get("cnt").map_err(anyhow::Error::new)?)
        } else {
            Ok(0)
        }
    }

    async fn fetch_areas(&self, q: neo4rs::Query) -> StoreResult<Vec<AreaNode>> {
        let mut result = self.graph.execute(q).await?;
        let mut areas = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("a").map_err(anyhow::Error::new)?;
            areas.push(node_to_area(&node)?);
        }
        Ok(areas)
    }
}

#[async_trait]
impl FacilityStore for Neo4jFacilityStore {
    // ========================================================================
    // Plant operations
    // ========================================================================

    async fn create_plant(&self, plant: &PlantNode) -> StoreResult<()> {
        let q = query(
            r#"
            CREATE (p:Plant {
                id: $id,
                name: $name,
                address: $address,
                created_at: $created_at,
                updated_at: $updated_at
            })
            "#,
        )
        .param("id", plant.id.to_string())
        .param("name", plant.name.clone())
        .param("address", plant.address.clone())
        .param("created_at", plant.created_at.to_rfc3339())
        .param("updated_at", plant.updated_at.to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn get_plant(&self, id: Uuid) -> StoreResult<Option<PlantNode>> {
        let q = query("MATCH (p:Plant {id: $id}) RETURN p").param("id", id.to_string());
        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p").map_err(anyhow::Error::new)?;
            Ok(Some(node_to_plant(&node)?))
        } else {
            Ok(None)
        }
    }

    async fn list_plants(&self) -> StoreResult<Vec<PlantNode>> {
        let q = query("MATCH (p:Plant) RETURN p ORDER BY p.name");
        let mut result = self.graph.execute(q).await?;
        let mut plants = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p").map_err(anyhow::Error::new)?;
            plants.push(node_to_plant(&node)?);
        }
        Ok(plants)
    }

    async fn update_plant(
        &self,
        id: Uuid,
        name: Option<String>,
        address: Option<String>,
    ) -> StoreResult<()> {
        let mut set_clauses = vec!["p.updated_at = $updated_at"];
        if name.is_some() {
            set_clauses.push("p.name = $name");
        }
        if address.is_some() {
            set_clauses.push("p.address = $address");
        }

        let cypher = format!("MATCH (p:Plant {{id: $id}}) SET {}", set_clauses.join(", "));
        let mut q = query(&cypher)
            .param("id", id.to_string())
            .param("updated_at", chrono::Utc::now().to_rfc3339());
        if let Some(name) = name {
            q = q.param("name", name);
        }
        if let Some(address) = address {
            q = q.param("address", address);
        }

        self.graph.run(q).await?;
        Ok(())
    }

    async fn delete_plant(&self, id: Uuid) -> StoreResult<()> {
        let areas = self
            .count(
                "MATCH (a:Area)-[:IN_PLANT]->(p:Plant {id: $id}) RETURN count(a) AS cnt",
                id,
            )
            .await?;
        if areas > 0 {
            return Err(StoreError::Dependency(format!(
                "plant {id} still has {areas} areas"
            )));
        }

        let q = query("MATCH (p:Plant {id: $id}) DETACH DELETE p").param("id", id.to_string());
        self.graph.run(q).await?;
        Ok(())
    }

    async fn get_plant_areas(&self, plant_id: Uuid) -> StoreResult<Vec<AreaNode>> {
        let q = query(
            r#"
            MATCH (a:Area)-[:IN_PLANT]->(p:Plant {id: $id})
            RETURN a
            ORDER BY a.name
            "#,
        )
        .param("id", plant_id.to_string());
        self.fetch_areas(q).await
    }

    // ========================================================================
    // Area operations
    // ========================================================================

    async fn create_area(&self, area: &AreaNode) -> StoreResult<()> {
        if !self.node_exists("Plant", area.plant_id).await? {
            return Err(StoreError::ForeignKey(format!(
                "plant {} does not exist",
                area.plant_id
            )));
        }

        let q = query(
            r#"
            MATCH (p:Plant {id: $plant_id})
            CREATE (a:Area {
                id: $id,
                name: $name,
                location_description: $location_description,
                plant_id: $plant_id,
                created_at: $created_at,
                updated_at: $updated_at
            })-[:IN_PLANT]->(p)
            "#,
        )
        .param("id", area.id.to_string())
        .param("name", area.name.clone())
        .param("location_description", area.location_description.clone())
        .param("plant_id", area.plant_id.to_string())
        .param("created_at", area.created_at.to_rfc3339())
        .param("updated_at", area.updated_at.to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn get_area(&self, id: Uuid) -> StoreResult<Option<AreaNode>> {
        let q = query("MATCH (a:Area {id: $id}) RETURN a").param("id", id.to_string());
        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("a").map_err(anyhow::Error::new)?;
            Ok(Some(node_to_area(&node)?))
        } else {
            Ok(None)
        }
    }

    async fn list_areas(&self) -> StoreResult<Vec<AreaNode>> {
        self.fetch_areas(query("MATCH (a:Area) RETURN a ORDER BY a.name"))
            .await
    }

    async fn get_areas_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<AreaSnapshot>> {
        let mut unique: Vec<String> = Vec::new();
        for id in ids {
            let s = id.to_string();
            if !unique.contains(&s) {
                unique.push(s);
            }
        }

        let q = query(
            r#"
            MATCH (a:Area)
            WHERE a.id IN $ids
            RETURN a, [(a)-[:NEIGHBOR_OF]->(n:Area) | n.id] AS neighbor_ids
            "#,
        )
        .param("ids", unique.clone());

        let mut result = self.graph.execute(q).await?;
        let mut found = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("a").map_err(anyhow::Error::new)?;
            let raw: Vec<String> = row.get("neighbor_ids").map_err(anyhow::Error::new)?;
            let mut neighbor_ids = Vec::with_capacity(raw.len());
            for s in raw {
                neighbor_ids.push(s.parse().map_err(anyhow::Error::new)?);
            }
            found.push(AreaSnapshot {
                area: node_to_area(&node)?,
                neighbor_ids,
            });
        }

        // Keep the caller's id order
        let mut ordered = Vec::with_capacity(found.len());
        for id in unique {
            let id: Uuid = id.parse().map_err(anyhow::Error::new)?;
            if let Some(pos) = found.iter().position(|s| s.area.id == id) {
                ordered.push(found.swap_remove(pos));
            }
        }
        Ok(ordered)
    }

    async fn get_area_neighbor_ids(&self, id: Uuid) -> StoreResult<Vec<Uuid>> {
        let q = query(
            r#"
            MATCH (a:Area {id: $id})-[:NEIGHBOR_OF]->(n:Area)
            RETURN n.id AS id
            "#,
        )
        .param("id", id.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut ids = Vec::new();
        while let Some(row) = result.next().await? {
            let raw: String = row.get("id").map_err(anyhow::Error::new)?;
            ids.push(raw.parse().map_err(anyhow::Error::new)?);
        }
        Ok(ids)
    }

    async fn get_area_neighbors(&self, id: Uuid) -> StoreResult<Vec<AreaNode>> {
        let q = query(
            r#"
            MATCH (x:Area {id: $id})-[:NEIGHBOR_OF]->(a:Area)
            RETURN a
            ORDER BY a.name
            "#,
        )
        .param("id", id.to_string());
        self.fetch_areas(q).await
    }

    async fn update_area_fields(
        &self,
        id: Uuid,
        name: Option<String>,
        location_description: Option<String>,
        plant_id: Option<Uuid>,
    ) -> StoreResult<()> {
        if let Some(plant_id) = plant_id {
            if !self.node_exists("Plant", plant_id).await? {
                return Err(StoreError::ForeignKey(format!(
                    "plant {plant_id} does not exist"
                )));
            }
            // Rewire the plant membership edge
            let q = query(
                r#"
                MATCH (a:Area {id: $id})
                OPTIONAL MATCH (a)-[r:IN_PLANT]->(:Plant)
                DELETE r
                WITH a
                MATCH (p:Plant {id: $plant_id})
                CREATE (a)-[:IN_PLANT]->(p)
                SET a.plant_id = $plant_id
                "#,
            )
            .param("id", id.to_string())
            .param("plant_id", plant_id.to_string());
            self.graph.run(q).await?;
        }

        let mut set_clauses = vec!["a.updated_at = $updated_at"];
        if name.is_some() {
            set_clauses.push("a.name = $name");
        }
        if location_description.is_some() {
            set_clauses.push("a.location_description = $location_description");
        }

        let cypher = format!("MATCH (a:Area {{id: $id}}) SET {}", set_clauses.join(", "));
        let mut q = query(&cypher)
            .param("id", id.to_string())
            .param("updated_at", chrono::Utc::now().to_rfc3339());
        if let Some(name) = name {
            q = q.param("name", name);
        }
        if let Some(location_description) = location_description {
            q = q.param("location_description", location_description);
        }

        self.graph.run(q).await?;
        Ok(())
    }

    async fn save_neighbor_lists(&self, updates: &[NeighborListUpdate]) -> StoreResult<()> {
        for update in updates {
            let q = query(
                r#"
                MATCH (a:Area {id: $id})
                OPTIONAL MATCH (a)-[r:NEIGHBOR_OF]->(:Area)
                DELETE r
                "#,
            )
            .param("id", update.area_id.to_string());
            self.graph.run(q).await?;

            if update.neighbor_ids.is_empty() {
                continue;
            }

            let ids: Vec<String> = update.neighbor_ids.iter().map(|n| n.to_string()).collect();
            let q = query(
                r#"
                MATCH (a:Area {id: $id})
                UNWIND $ids AS neighbor_id
                MATCH (n:Area {id: neighbor_id})
                CREATE (a)-[:NEIGHBOR_OF]->(n)
                "#,
            )
            .param("id", update.area_id.to_string())
            .param("ids", ids);
            self.graph.run(q).await?;
        }
        Ok(())
    }

    async fn delete_area(&self, id: Uuid) -> StoreResult<()> {
        let equipment = self
            .count(
                "MATCH (e:Equipment)-[:LOCATED_IN]->(a:Area {id: $id}) RETURN count(e) AS cnt",
                id,
            )
            .await?;
        if equipment > 0 {
            return Err(StoreError::Dependency(format!(
                "area {id} still has {equipment} equipment"
            )));
        }

        let q = query("MATCH (a:Area {id: $id}) DETACH DELETE a").param("id", id.to_string());
        self.graph.run(q).await?;
        Ok(())
    }

    async fn get_area_equipment(&self, id: Uuid) -> StoreResult<Vec<EquipmentNode>> {
        let q = query(
            r#"
            MATCH (e:Equipment)-[:LOCATED_IN]->(a:Area {id: $id})
            RETURN e
            ORDER BY e.name
            "#,
        )
        .param("id", id.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut equipment = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("e").map_err(anyhow::Error::new)?;
            equipment.push(node_to_equipment(&node)?);
        }
        Ok(equipment)
    }

    // ========================================================================
    // Equipment operations
    // ========================================================================

    async fn create_equipment(
        &self,
        equipment: &EquipmentNode,
        area_ids: &[Uuid],
    ) -> StoreResult<()> {
        for area_id in area_ids {
            if !self.node_exists("Area", *area_id).await? {
                return Err(StoreError::ForeignKey(format!(
                    "area {area_id} does not exist"
                )));
            }
        }

        let q = query(
            r#"
            CREATE (e:Equipment {
                id: $id,
                name: $name,
                manufacturer: $manufacturer,
                serial_number: $serial_number,
                initial_operations_date: $initial_operations_date,
                created_at: $created_at,
                updated_at: $updated_at
            })
            "#,
        )
        .param("id", equipment.id.to_string())
        .param("name", equipment.name.clone())
        .param("manufacturer", equipment.manufacturer.clone())
        .param("serial_number", equipment.serial_number.clone())
        .param(
            "initial_operations_date",
            equipment.initial_operations_date.to_string(),
        )
        .param("created_at", equipment.created_at.to_rfc3339())
        .param("updated_at", equipment.updated_at.to_rfc3339());
        self.graph.run(q).await?;

        self.set_equipment_areas(equipment.id, area_ids).await
    }

    async fn get_equipment(&self, id: Uuid) -> StoreResult<Option<EquipmentNode>> {
        let q = query("MATCH (e:Equipment {id: $id}) RETURN e").param("id", id.to_string());
        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("e").map_err(anyhow::Error::new)?;
            Ok(Some(node_to_equipment(&node)?))
        } else {
            Ok(None)
        }
    }

    async fn list_equipment(&self) -> StoreResult<Vec<EquipmentNode>> {
        let q = query("MATCH (e:Equipment) RETURN e ORDER BY e.name");
        let mut result = self.graph.execute(q).await?;
        let mut equipment = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("e").map_err(anyhow::Error::new)?;
            equipment.push(node_to_equipment(&node)?);
        }
        Ok(equipment)
    }

    async fn update_equipment_fields(
        &self,
        id: Uuid,
        name: Option<String>,
        manufacturer: Option<String>,
        serial_number: Option<String>,
        initial_operations_date: Option<NaiveDate>,
    ) -> StoreResult<()> {
        let mut set_clauses = vec!["e.updated_at = $updated_at"];
        if name.is_some() {
            set_clauses.push("e.name = $name");
        }
        if manufacturer.is_some() {
            set_clauses.push("e.manufacturer = $manufacturer");
        }
        if serial_number.is_some() {
            set_clauses.push("e.serial_number = $serial_number");
        }
        if initial_operations_date.is_some() {
            set_clauses.push("e.initial_operations_date = $initial_operations_date");
        }

        let cypher = format!(
            "MATCH (e:Equipment {{id: $id}}) SET {}",
            set_clauses.join(", ")
        );
        let mut q = query(&cypher)
            .param("id", id.to_string())
            .param("updated_at", chrono::Utc::now().to_rfc3339());
        if let Some(name) = name {
            q = q.param("name", name);
        }
        if let Some(manufacturer) = manufacturer {
            q = q.param("manufacturer", manufacturer);
        }
        if let Some(serial_number) = serial_number {
            q = q.param("serial_number", serial_number);
        }
        if let Some(date) = initial_operations_date {
            q = q.param("initial_operations_date", date.to_string());
        }

        self.graph.run(q).await?;
        Ok(())
    }

    async fn set_equipment_areas(&self, id: Uuid, area_ids: &[Uuid]) -> StoreResult<()> {
        let q = query(
            r#"
            MATCH (e:Equipment {id: $id})-[r:LOCATED_IN]->(:Area)
            DELETE r
            "#,
        )
        .param("id", id.to_string());
        self.graph.run(q).await?;

        if area_ids.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = area_ids.iter().map(|a| a.to_string()).collect();
        let q = query(
            r#"
            MATCH (e:Equipment {id: $id})
            UNWIND $ids AS area_id
            MATCH (a:Area {id: area_id})
            CREATE (e)-[:LOCATED_IN]->(a)
            "#,
        )
        .param("id", id.to_string())
        .param("ids", ids);
        self.graph.run(q).await?;
        Ok(())
    }

    async fn get_equipment_areas(&self, id: Uuid) -> StoreResult<Vec<AreaNode>> {
        let q = query(
            r#"
            MATCH (e:Equipment {id: $id})-[:LOCATED_IN]->(a:Area)
            RETURN a
            ORDER BY a.name
            "#,
        )
        .param("id", id.to_string());
        self.fetch_areas(q).await
    }

    async fn get_equipment_parts(&self, id: Uuid) -> StoreResult<Vec<PartNode>> {
        let q = query(
            r#"
            MATCH (p:Part)-[:PART_OF]->(e:Equipment {id: $id})
            RETURN p
            ORDER BY p.name
            "#,
        )
        .param("id", id.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut parts = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p").map_err(anyhow::Error::new)?;
            parts.push(node_to_part(&node)?);
        }
        Ok(parts)
    }

    async fn delete_equipment(&self, id: Uuid) -> StoreResult<()> {
        let parts = self
            .count(
                "MATCH (p:Part)-[:PART_OF]->(e:Equipment {id: $id}) RETURN count(p) AS cnt",
                id,
            )
            .await?;
        if parts > 0 {
            return Err(StoreError::Dependency(format!(
                "equipment {id} still has {parts} parts"
            )));
        }

        let q = query("MATCH (e:Equipment {id: $id}) DETACH DELETE e").param("id", id.to_string());
        self.graph.run(q).await?;
        Ok(())
    }

    // ========================================================================
    // Part operations
    // ========================================================================

    async fn create_part(&self, part: &PartNode) -> StoreResult<()> {
        if !self.node_exists("Equipment", part.equipment_id).await? {
            return Err(StoreError::ForeignKey(format!(
                "equipment {} does not exist",
                part.equipment_id
            )));
        }

        let q = query(
            r#"
            MATCH (e:Equipment {id: $equipment_id})
            CREATE (p:Part {
                id: $id,
                name: $name,
                part_type: $part_type,
                manufacturer: $manufacturer,
                serial_number: $serial_number,
                installation_date: $installation_date,
                equipment_id: $equipment_id,
                created_at: $created_at,
                updated_at: $updated_at
            })-[:PART_OF]->(e)
            "#,
        )
        .param("id", part.id.to_string())
        .param("name", part.name.clone())
        .param("part_type", enum_to_str(&part.part_type)?)
        .param("manufacturer", part.manufacturer.clone())
        .param("serial_number", part.serial_number.clone())
        .param("installation_date", part.installation_date.to_string())
        .param("equipment_id", part.equipment_id.to_string())
        .param("created_at", part.created_at.to_rfc3339())
        .param("updated_at", part.updated_at.to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn get_part(&self, id: Uuid) -> StoreResult<Option<PartNode>> {
        let q = query("MATCH (p:Part {id: $id}) RETURN p").param("id", id.to_string());
        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p").map_err(anyhow::Error::new)?;
            Ok(Some(node_to_part(&node)?))
        } else {
            Ok(None)
        }
    }

    async fn list_parts(&self) -> StoreResult<Vec<PartNode>> {
        let q = query("MATCH (p:Part) RETURN p ORDER BY p.name");
        let mut result = self.graph.execute(q).await?;
        let mut parts = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p").map_err(anyhow::Error::new)?;
            parts.push(node_to_part(&node)?);
        }
        Ok(parts)
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
            if !self.node_exists("Equipment", equipment_id).await? {
                return Err(StoreError::ForeignKey(format!(
                    "equipment {equipment_id} does not exist"
                )));
            }
            // Rewire ownership
            let q = query(
                r#"
                MATCH (p:Part {id: $id})
                OPTIONAL MATCH (p)-[r:PART_OF]->(:Equipment)
                DELETE r
                WITH p
                MATCH (e:Equipment {id: $equipment_id})
                CREATE (p)-[:PART_OF]->(e)
                SET p.equipment_id = $equipment_id
                "#,
            )
            .param("id", id.to_string())
            .param("equipment_id", equipment_id.to_string());
            self.graph.run(q).await?;
        }

        let mut set_clauses = vec!["p.updated_at = $updated_at"];
        if name.is_some() {
            set_clauses.push("p.name = $name");
        }
        if part_type.is_some() {
            set_clauses.push("p.part_type = $part_type");
        }
        if manufacturer.is_some() {
            set_clauses.push("p.manufacturer = $manufacturer");
        }
        if serial_number.is_some() {
            set_clauses.push("p.serial_number = $serial_number");
        }
        if installation_date.is_some() {
            set_clauses.push("p.installation_date = $installation_date");
        }

        let cypher = format!("MATCH (p:Part {{id: $id}}) SET {}", set_clauses.join(", "));
        let mut q = query(&cypher)
            .param("id", id.to_string())
            .param("updated_at", chrono::Utc::now().to_rfc3339());
        if let Some(name) = name {
            q = q.param("name", name);
        }
        if let Some(part_type) = part_type {
            q = q.param("part_type", enum_to_str(&part_type)?);
        }
        if let Some(manufacturer) = manufacturer {
            q = q.param("manufacturer", manufacturer);
        }
        if let Some(serial_number) = serial_number {
            q = q.param("serial_number", serial_number);
        }
        if let Some(date) = installation_date {
            q = q.param("installation_date", date.to_string());
        }

        self.graph.run(q).await?;
        Ok(())
    }

    async fn delete_part(&self, id: Uuid) -> StoreResult<()> {
        let q = query("MATCH (p:Part {id: $id}) DETACH DELETE p").param("id", id.to_string());
        self.graph.run(q).await?;
        Ok(())
    }

    // ========================================================================
    // Maintenance operations
    // ========================================================================

    async fn create_maintenance(&self, maintenance: &MaintenanceNode) -> StoreResult<()> {
        if !self.node_exists("Part", maintenance.part_id).await? {
            return Err(StoreError::ForeignKey(format!(
                "part {} does not exist",
                maintenance.part_id
            )));
        }

        let q = query(
            r#"
            MATCH (p:Part {id: $part_id})
            CREATE (m:Maintenance {
                id: $id,
                title: $title,
                description: $description,
                frequency_type: $frequency_type,
                frequency_value: $frequency_value,
                reference_type: $reference_type,
                specific_date: $specific_date,
                is_completed: $is_completed,
                completed_date: $completed_date,
                part_id: $part_id,
                next_due_date: $next_due_date,
                created_at: $created_at,
                updated_at: $updated_at
            })-[:FOR_PART]->(p)
            "#,
        )
        .param("id", maintenance.id.to_string())
        .param("title", maintenance.title.clone())
        .param(
            "description",
            maintenance.description.clone().unwrap_or_default(),
        )
        .param("frequency_type", enum_to_str(&maintenance.frequency_type)?)
        .param("frequency_value", maintenance.frequency_value as i64)
        .param("reference_type", enum_to_str(&maintenance.reference_type)?)
        .param("specific_date", date_param(maintenance.specific_date))
        .param("is_completed", maintenance.is_completed)
        .param("completed_date", date_param(maintenance.completed_date))
        .param("part_id", maintenance.part_id.to_string())
        .param("next_due_date", date_param(maintenance.next_due_date))
        .param("created_at", maintenance.created_at.to_rfc3339())
        .param("updated_at", maintenance.updated_at.to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn get_maintenance(&self, id: Uuid) -> StoreResult<Option<MaintenanceNode>> {
        let q = query("MATCH (m:Maintenance {id: $id}) RETURN m").param("id", id.to_string());
        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("m").map_err(anyhow::Error::new)?;
            Ok(Some(node_to_maintenance(&node)?))
        } else {
            Ok(None)
        }
    }

    async fn list_maintenance(&self) -> StoreResult<Vec<MaintenanceNode>> {
        let q = query("MATCH (m:Maintenance) RETURN m ORDER BY m.next_due_date");
        let mut result = self.graph.execute(q).await?;
        let mut records = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("m").map_err(anyhow::Error::new)?;
            records.push(node_to_maintenance(&node)?);
        }
        Ok(records)
    }

    async fn list_open_maintenance(&self, today: NaiveDate) -> StoreResult<Vec<MaintenanceNode>> {
        // ISO dates compare correctly as strings
        let q = query(
            r#"
            MATCH (m:Maintenance)
            WHERE m.is_completed = false OR m.next_due_date > $today
            RETURN m
            ORDER BY m.next_due_date
            "#,
        )
        .param("today", today.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut records = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("m").map_err(anyhow::Error::new)?;
            records.push(node_to_maintenance(&node)?);
        }
        Ok(records)
    }

    async fn save_maintenance(&self, maintenance: &MaintenanceNode) -> StoreResult<()> {
        let q = query(
            r#"
            MATCH (m:Maintenance {id: $id})
            SET m.title = $title,
                m.description = $description,
                m.frequency_type = $frequency_type,
                m.frequency_value = $frequency_value,
                m.reference_type = $reference_type,
                m.specific_date = $specific_date,
                m.is_completed = $is_completed,
                m.completed_date = $completed_date,
                m.part_id = $part_id,
                m.next_due_date = $next_due_date,
                m.updated_at = $updated_at
            "#,
        )
        .param("id", maintenance.id.to_string())
        .param("title", maintenance.title.clone())
        .param(
            "description",
            maintenance.description.clone().unwrap_or_default(),
        )
        .param("frequency_type", enum_to_str(&maintenance.frequency_type)?)
        .param("frequency_value", maintenance.frequency_value as i64)
        .param("reference_type", enum_to_str(&maintenance.reference_type)?)
        .param("specific_date", date_param(maintenance.specific_date))
        .param("is_completed", maintenance.is_completed)
        .param("completed_date", date_param(maintenance.completed_date))
        .param("part_id", maintenance.part_id.to_string())
        .param("next_due_date", date_param(maintenance.next_due_date))
        .param("updated_at", maintenance.updated_at.to_rfc3339());

        self.graph.run(q).await?;
        Ok(())
    }

    async fn delete_maintenance(&self, id: Uuid) -> StoreResult<()> {
        let q = query("MATCH (m:Maintenance {id: $id}) DETACH DELETE m").param("id", id.to_string());
        self.graph.run(q).await?;
        Ok(())
    }
}
