//! Neighbor service — incremental edge mutation endpoints.
//!
//! Complements the area service's full-replacement update with add/remove
//! operations on individual edges. Both operations keep the graph symmetric
//! and save every touched row in one batch.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::services::error::{DomainError, DomainResult};
use crate::services::models::AreaWithPlant;
use crate::store::models::NeighborListUpdate;
use crate::store::FacilityStore;

pub struct NeighborService {
    store: Arc<dyn FacilityStore>,
}

impl NeighborService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    /// Add edges between an area and each of the listed targets.
    ///
    /// Re-adding an existing neighbor is a no-op for that pair. The
    /// self-neighbor check runs before any store access.
    pub async fn add_neighbor(&self, area_id: Uuid, neighbor_ids: &[Uuid]) -> DomainResult<()> {
        if neighbor_ids.contains(&area_id) {
            return Err(DomainError::InvalidData(
                "An area cannot be a neighbor of itself".into(),
            ));
        }

        let area = self
            .store
            .get_areas_by_ids(&[area_id])
            .await?
            .pop()
            .ok_or_else(|| DomainError::NotFound("Area not found".into()))?;

        let targets = self.store.get_areas_by_ids(neighbor_ids).await?;
        if targets.len() != neighbor_ids.len() {
            return Err(DomainError::NotFound(
                "One or more neighbor areas not found".into(),
            ));
        }

        let existing: HashSet<Uuid> = area.neighbor_ids.iter().copied().collect();
        let mut area_list = area.neighbor_ids.clone();
        let mut updates = Vec::new();

        for target in targets {
            if existing.contains(&target.area.id) {
                continue;
            }
            area_list.push(target.area.id);
            if !target.neighbor_ids.contains(&area_id) {
                let mut list = target.neighbor_ids;
                list.push(area_id);
                updates.push(NeighborListUpdate {
                    area_id: target.area.id,
                    neighbor_ids: list,
                });
            }
        }

        if updates.is_empty() && area_list.len() == area.neighbor_ids.len() {
            return Ok(());
        }

        updates.insert(
            0,
            NeighborListUpdate {
                area_id,
                neighbor_ids: area_list,
            },
        );
        self.store.save_neighbor_lists(&updates).await?;
        Ok(())
    }

    /// Remove the listed edges from an area.
    ///
    /// An area with zero neighbors returns immediately without error or
    /// mutation. Target ids that do not resolve are silently skipped.
    pub async fn remove_neighbor(&self, area_id: Uuid, neighbor_ids: &[Uuid]) -> DomainResult<()> {
        let area = self
            .store
            .get_areas_by_ids(&[area_id])
            .await?
            .pop()
            .ok_or_else(|| DomainError::NotFound("Area not found".into()))?;

        if area.neighbor_ids.is_empty() {
            return Ok(());
        }

        let remove: HashSet<Uuid> = neighbor_ids.iter().copied().collect();
        let mut updates = vec![NeighborListUpdate {
            area_id,
            neighbor_ids: area
                .neighbor_ids
                .iter()
                .copied()
                .filter(|n| !remove.contains(n))
                .collect(),
        }];

        // Only targets that currently list this area back get touched
        for target in self.store.get_areas_by_ids(neighbor_ids).await? {
            if target.neighbor_ids.contains(&area_id) {
                updates.push(NeighborListUpdate {
                    area_id: target.area.id,
                    neighbor_ids: target
                        .neighbor_ids
                        .into_iter()
                        .filter(|n| *n != area_id)
                        .collect(),
                });
            }
        }

        self.store.save_neighbor_lists(&updates).await?;
        Ok(())
    }

    /// The area's neighbor list with each neighbor's plant populated.
    pub async fn get_neighbors(&self, area_id: Uuid) -> DomainResult<Vec<AreaWithPlant>> {
        self.store
            .get_area(area_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Area not found".into()))?;

        let mut result = Vec::new();
        for neighbor in self.store.get_area_neighbors(area_id).await? {
            let plant = self.store.get_plant(neighbor.plant_id).await?;
            result.push(AreaWithPlant {
                area: neighbor,
                plant,
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::{fixtures, MockFacilityStore};
    use crate::store::models::AreaNode;

    async fn setup_areas(n: usize) -> (Arc<MockFacilityStore>, NeighborService, Vec<AreaNode>) {
        let store = Arc::new(MockFacilityStore::new());
        let plant = fixtures::plant("Steelworks");
        store.create_plant(&plant).await.unwrap();
        let mut areas = Vec::new();
        for i in 0..n {
            let area = fixtures::area(plant.id, &format!("Area {}", i));
            store.create_area(&area).await.unwrap();
            areas.push(area);
        }
        let service = NeighborService::new(store.clone());
        (store, service, areas)
    }

    #[tokio::test]
    async fn test_self_neighbor_rejected_before_store_access() {
        let store = Arc::new(MockFacilityStore::new());
        let service = NeighborService::new(store.clone());
        let id = Uuid::new_v4();

        // The area does not even exist; the self-neighbor check fires first
        let err = service.add_neighbor(id, &[id]).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_add_neighbor_is_symmetric() {
        let (store, service, areas) = setup_areas(2).await;
        service
            .add_neighbor(areas[0].id, &[areas[1].id])
            .await
            .unwrap();

        assert_eq!(
            store.get_area_neighbor_ids(areas[0].id).await.unwrap(),
            vec![areas[1].id]
        );
        assert_eq!(
            store.get_area_neighbor_ids(areas[1].id).await.unwrap(),
            vec![areas[0].id]
        );
    }

    #[tokio::test]
    async fn test_add_neighbor_is_idempotent() {
        let (store, service, areas) = setup_areas(2).await;
        service
            .add_neighbor(areas[0].id, &[areas[1].id])
            .await
            .unwrap();
        service
            .add_neighbor(areas[0].id, &[areas[1].id])
            .await
            .unwrap();

        assert_eq!(
            store.get_area_neighbor_ids(areas[0].id).await.unwrap().len(),
            1
        );
        assert_eq!(
            store.get_area_neighbor_ids(areas[1].id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_add_neighbor_unknown_target_fails() {
        let (_, service, areas) = setup_areas(1).await;
        let err = service
            .add_neighbor(areas[0].id, &[Uuid::new_v4()])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_neighbor_unknown_area_fails() {
        let (_, service, areas) = setup_areas(1).await;
        let err = service
            .add_neighbor(Uuid::new_v4(), &[areas[0].id])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_one_of_two_neighbors() {
        let (store, service, areas) = setup_areas(3).await;
        let (a, b, c) = (areas[0].id, areas[1].id, areas[2].id);
        service.add_neighbor(a, &[b, c]).await.unwrap();

        service.remove_neighbor(a, &[b]).await.unwrap();

        assert_eq!(store.get_area_neighbor_ids(a).await.unwrap(), vec![c]);
        assert!(store.get_area_neighbor_ids(b).await.unwrap().is_empty());
        assert_eq!(store.get_area_neighbor_ids(c).await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn test_remove_from_area_with_no_neighbors_is_noop() {
        let (store, service, areas) = setup_areas(2).await;
        service
            .remove_neighbor(areas[0].id, &[areas[1].id])
            .await
            .unwrap();
        assert!(store
            .get_area_neighbor_ids(areas[0].id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_remove_nonexistent_edge_is_noop() {
        let (store, service, areas) = setup_areas(3).await;
        let (a, b, c) = (areas[0].id, areas[1].id, areas[2].id);
        service.add_neighbor(a, &[b]).await.unwrap();

        // c is not a neighbor of a; removal succeeds without mutating c
        service.remove_neighbor(a, &[c]).await.unwrap();

        assert_eq!(store.get_area_neighbor_ids(a).await.unwrap(), vec![b]);
        assert!(store.get_area_neighbor_ids(c).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_neighbors_populates_plant() {
        let (_, service, areas) = setup_areas(2).await;
        service
            .add_neighbor(areas[0].id, &[areas[1].id])
            .await
            .unwrap();

        let neighbors = service.get_neighbors(areas[0].id).await.unwrap();
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].area.id, areas[1].id);
        assert!(neighbors[0].plant.is_some());
    }

    #[tokio::test]
    async fn test_get_neighbors_missing_area_fails() {
        let (_, service, _) = setup_areas(0).await;
        let err = service.get_neighbors(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
