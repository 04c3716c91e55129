//! Maintenance service — scheduling and recurrence.
//!
//! A maintenance record carries a recurrence (`frequency_type` +
//! `frequency_value`) measured from a reference date on the part: either the
//! part's installation date or the owning equipment's initial operations
//! date. The next due date is the first whole interval from the reference
//! that lands today or later. Completing a cyclic record spawns the next
//! occurrence; one-shot (`specific_date`) records do not recur.

use std::sync::Arc;

use chrono::{Duration, Months, NaiveDate, Utc};
use uuid::Uuid;

use crate::services::error::{DomainError, DomainResult};
use crate::services::models::{MaintenanceDetails, MaintenanceUpdate, NewMaintenance, PartDetails};
use crate::store::models::{FrequencyType, MaintenanceNode, PartNode, ReferenceType};
use crate::store::FacilityStore;

/// One recurrence interval forward from `date`.
///
/// `specific_date` records normally bypass this function; when one lacks its
/// literal date the scheduler falls back to quarterly steps.
fn advance(date: NaiveDate, frequency_type: FrequencyType, value: i32) -> NaiveDate {
    let value = value.max(0);
    match frequency_type {
        FrequencyType::Days => date + Duration::days(value as i64),
        FrequencyType::Weeks => date + Duration::weeks(value as i64),
        FrequencyType::Months => date
            .checked_add_months(Months::new(value as u32))
            .unwrap_or(date),
        FrequencyType::Years => date
            .checked_add_months(Months::new(value as u32 * 12))
            .unwrap_or(date),
        FrequencyType::SpecificDate => date
            .checked_add_months(Months::new(3))
            .unwrap_or(date),
    }
}

/// First due date at or after `today`, walking whole intervals from
/// `reference`.
fn next_due_date(
    reference: NaiveDate,
    frequency_type: FrequencyType,
    value: i32,
    today: NaiveDate,
) -> NaiveDate {
    let mut due = advance(reference, frequency_type, value);
    while due < today {
        let next = advance(due, frequency_type, value);
        if next == due {
            // zero-length interval, the walk cannot make progress
            break;
        }
        due = next;
    }
    due
}

pub struct MaintenanceService {
    store: Arc<dyn FacilityStore>,
}

impl MaintenanceService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> DomainResult<Vec<MaintenanceDetails>> {
        let mut result = Vec::new();
        for maintenance in self.store.list_maintenance().await? {
            result.push(self.load_details(maintenance).await?);
        }
        Ok(result)
    }

    /// Open records plus completed ones whose due date is still ahead,
    /// ordered by due date.
    pub async fn find_all_future(&self) -> DomainResult<Vec<MaintenanceDetails>> {
        let today = Utc::now().date_naive();
        let mut result = Vec::new();
        for maintenance in self.store.list_open_maintenance(today).await? {
            result.push(self.load_details(maintenance).await?);
        }
        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DomainResult<MaintenanceDetails> {
        let maintenance = self
            .store
            .get_maintenance(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Maintenance not found".into()))?;
        self.load_details(maintenance).await
    }

    pub async fn create(&self, req: NewMaintenance) -> DomainResult<MaintenanceDetails> {
        let part = self
            .store
            .get_part(req.part_id)
            .await?
            .ok_or_else(|| DomainError::InvalidForeignKey("Invalid part ID".into()))?;

        let next_due = self
            .schedule(
                &part,
                req.frequency_type,
                req.frequency_value,
                req.reference_type,
                req.specific_date,
            )
            .await?;

        let now = Utc::now();
        let maintenance = MaintenanceNode {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            frequency_type: req.frequency_type,
            frequency_value: req.frequency_value,
            reference_type: req.reference_type,
            specific_date: req.specific_date,
            is_completed: false,
            completed_date: None,
            part_id: req.part_id,
            next_due_date: Some(next_due),
            created_at: now,
            updated_at: now,
        };
        self.store.create_maintenance(&maintenance).await?;
        self.load_details(maintenance).await
    }

    pub async fn update(&self, id: Uuid, req: MaintenanceUpdate) -> DomainResult<MaintenanceDetails> {
        let mut maintenance = self
            .store
            .get_maintenance(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Maintenance not found".into()))?;

        if let Some(part_id) = req.part_id {
            self.store
                .get_part(part_id)
                .await?
                .ok_or_else(|| DomainError::InvalidForeignKey("Invalid part ID".into()))?;
            maintenance.part_id = part_id;
        }

        let reschedule = req.frequency_type.is_some()
            || req.frequency_value.is_some()
            || req.reference_type.is_some()
            || req.specific_date.is_some()
            || req.part_id.is_some();

        if let Some(title) = req.title {
            maintenance.title = title;
        }
        if let Some(description) = req.description {
            maintenance.description = Some(description);
        }
        if let Some(frequency_type) = req.frequency_type {
            maintenance.frequency_type = frequency_type;
        }
        if let Some(frequency_value) = req.frequency_value {
            maintenance.frequency_value = frequency_value;
        }
        if let Some(reference_type) = req.reference_type {
            maintenance.reference_type = reference_type;
        }
        if let Some(specific_date) = req.specific_date {
            maintenance.specific_date = Some(specific_date);
        }

        if reschedule {
            let part = self
                .store
                .get_part(maintenance.part_id)
                .await?
                .ok_or_else(|| DomainError::InvalidForeignKey("Invalid part ID".into()))?;
            let next_due = self
                .schedule(
                    &part,
                    maintenance.frequency_type,
                    maintenance.frequency_value,
                    maintenance.reference_type,
                    maintenance.specific_date,
                )
                .await?;
            maintenance.next_due_date = Some(next_due);
        }

        maintenance.updated_at = Utc::now();
        self.store.save_maintenance(&maintenance).await?;
        self.load_details(maintenance).await
    }

    /// Mark a record completed and, for cyclic records, create the next
    /// occurrence.
    pub async fn mark_complete(
        &self,
        id: Uuid,
        completed_date: Option<NaiveDate>,
    ) -> DomainResult<MaintenanceDetails> {
        let mut maintenance = self
            .store
            .get_maintenance(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Maintenance not found".into()))?;

        maintenance.is_completed = true;
        maintenance.completed_date = Some(completed_date.unwrap_or_else(|| Utc::now().date_naive()));
        maintenance.updated_at = Utc::now();
        self.store.save_maintenance(&maintenance).await?;

        if maintenance.frequency_type != FrequencyType::SpecificDate {
            self.create(NewMaintenance {
                title: maintenance.title.clone(),
                description: maintenance.description.clone(),
                frequency_type: maintenance.frequency_type,
                frequency_value: maintenance.frequency_value,
                reference_type: maintenance.reference_type,
                specific_date: maintenance.specific_date,
                part_id: maintenance.part_id,
            })
            .await?;
        }

        self.load_details(maintenance).await
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.store
            .get_maintenance(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Maintenance not found".into()))?;
        self.store.delete_maintenance(id).await?;
        Ok(())
    }

    /// Compute the next due date for a record attached to `part`.
    async fn schedule(
        &self,
        part: &PartNode,
        frequency_type: FrequencyType,
        frequency_value: i32,
        reference_type: ReferenceType,
        specific_date: Option<NaiveDate>,
    ) -> DomainResult<NaiveDate> {
        if frequency_type == FrequencyType::SpecificDate {
            if let Some(date) = specific_date {
                return Ok(date);
            }
        }

        let reference = match reference_type {
            ReferenceType::PartInstallation => part.installation_date,
            ReferenceType::EquipmentOperation => {
                let equipment = self
                    .store
                    .get_equipment(part.equipment_id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::InvalidForeignKey(
                            "Part is not associated with any equipment".into(),
                        )
                    })?;
                equipment.initial_operations_date
            }
        };

        Ok(next_due_date(
            reference,
            frequency_type,
            frequency_value,
            Utc::now().date_naive(),
        ))
    }

    async fn load_details(&self, maintenance: MaintenanceNode) -> DomainResult<MaintenanceDetails> {
        let part = match self.store.get_part(maintenance.part_id).await? {
            Some(part) => {
                let equipment = self.store.get_equipment(part.equipment_id).await?;
                Some(PartDetails { part, equipment })
            }
            None => None,
        };
        Ok(MaintenanceDetails { maintenance, part })
    }
}
