//! Plant service — plain CRUD over the facility roots.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::services::error::{DomainError, DomainResult};
use crate::services::models::{NewPlant, PlantDetails, PlantUpdate};
use crate::store::models::PlantNode;
use crate::store::{FacilityStore, StoreError};

pub struct PlantService {
    store: Arc<dyn FacilityStore>,
}

impl PlantService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> DomainResult<Vec<PlantDetails>> {
        let mut result = Vec::new();
        for plant in self.store.list_plants().await? {
            let areas = self.store.get_plant_areas(plant.id).await?;
            result.push(PlantDetails { plant, areas });
        }
        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DomainResult<PlantDetails> {
        let plant = self
            .store
            .get_plant(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Plant not found".into()))?;
        let areas = self.store.get_plant_areas(id).await?;
        Ok(PlantDetails { plant, areas })
    }

    pub async fn create(&self, req: NewPlant) -> DomainResult<PlantDetails> {
        let now = Utc::now();
        let plant = PlantNode {
            id: Uuid::new_v4(),
            name: req.name,
            address: req.address,
            created_at: now,
            updated_at: now,
        };
        self.store.create_plant(&plant).await?;
        Ok(PlantDetails {
            plant,
            areas: Vec::new(),
        })
    }

    pub async fn update(&self, id: Uuid, req: PlantUpdate) -> DomainResult<PlantDetails> {
        self.store
            .get_plant(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Plant not found".into()))?;

        if req.name.is_some() || req.address.is_some() {
            self.store.update_plant(id, req.name, req.address).await?;
        }
        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.store
            .get_plant(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Plant not found".into()))?;

        match self.store.delete_plant(id).await {
            Ok(()) => Ok(()),
            Err(StoreError::Dependency(_) | StoreError::Constraint(_)) => {
                Err(DomainError::DependencyExists(
                    "Cannot delete plant with associated areas".into(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::{fixtures, MockFacilityStore};

    fn service() -> (Arc<MockFacilityStore>, PlantService) {
        let store = Arc::new(MockFacilityStore::new());
        (store.clone(), PlantService::new(store))
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let (_, service) = service();
        let created = service
            .create(NewPlant {
                name: "Steelworks".into(),
                address: "1 Mill Rd".into(),
            })
            .await
            .unwrap();

        let fetched = service.find_by_id(created.plant.id).await.unwrap();
        assert_eq!(fetched.plant.name, "Steelworks");
        assert!(fetched.areas.is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let (_, service) = service();
        let created = service
            .create(NewPlant {
                name: "Steelworks".into(),
                address: "1 Mill Rd".into(),
            })
            .await
            .unwrap();

        let updated = service
            .update(
                created.plant.id,
                PlantUpdate {
                    address: Some("2 Mill Rd".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.plant.name, "Steelworks");
        assert_eq!(updated.plant.address, "2 Mill Rd");
    }

    #[tokio::test]
    async fn test_delete_blocked_by_areas() {
        let (store, service) = service();
        let created = service
            .create(NewPlant {
                name: "Steelworks".into(),
                address: "1 Mill Rd".into(),
            })
            .await
            .unwrap();
        store
            .create_area(&fixtures::area(created.plant.id, "North hall"))
            .await
            .unwrap();

        let err = service.delete(created.plant.id).await.unwrap_err();
        assert!(matches!(err, DomainError::DependencyExists(_)));
    }

    #[tokio::test]
    async fn test_missing_plant_is_not_found() {
        let (_, service) = service();
        let err = service.find_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
