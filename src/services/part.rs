//! Part service.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::services::error::{DomainError, DomainResult};
use crate::services::models::{NewPart, PartDetails, PartUpdate};
use crate::store::models::PartNode;
use crate::store::FacilityStore;

pub struct PartService {
    store: Arc<dyn FacilityStore>,
}

impl PartService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> DomainResult<Vec<PartDetails>> {
        let mut result = Vec::new();
        for part in self.store.list_parts().await? {
            result.push(self.load_details(part).await?);
        }
        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DomainResult<PartDetails> {
        let part = self
            .store
            .get_part(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Part not found".into()))?;
        self.load_details(part).await
    }

    pub async fn create(&self, req: NewPart) -> DomainResult<PartDetails> {
        self.store
            .get_equipment(req.equipment_id)
            .await?
            .ok_or_else(|| DomainError::InvalidForeignKey("Invalid equipment ID".into()))?;

        let now = Utc::now();
        let part = PartNode {
            id: Uuid::new_v4(),
            name: req.name,
            part_type: req.part_type,
            manufacturer: req.manufacturer,
            serial_number: req.serial_number,
            installation_date: req.installation_date,
            equipment_id: req.equipment_id,
            created_at: now,
            updated_at: now,
        };
        self.store.create_part(&part).await?;
        self.load_details(part).await
    }

    pub async fn update(&self, id: Uuid, req: PartUpdate) -> DomainResult<PartDetails> {
        self.store
            .get_part(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Part not found".into()))?;

        if let Some(equipment_id) = req.equipment_id {
            self.store
                .get_equipment(equipment_id)
                .await?
                .ok_or_else(|| DomainError::InvalidForeignKey("Invalid equipment ID".into()))?;
        }

        self.store
            .update_part_fields(
                id,
                req.name,
                req.part_type,
                req.manufacturer,
                req.serial_number,
                req.installation_date,
                req.equipment_id,
            )
            .await?;
        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.store
            .get_part(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Part not found".into()))?;
        self.store.delete_part(id).await?;
        Ok(())
    }

    async fn load_details(&self, part: PartNode) -> DomainResult<PartDetails> {
        let equipment = self.store.get_equipment(part.equipment_id).await?;
        Ok(PartDetails { part, equipment })
    }
}
