//! Process-local `DoseLogRepository` implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{DoseLogRepository, DoseLogRepositoryError};
use crate::domain::{ConsumptionRecord, MedicineId, MissedDose, UserId};

#[derive(Default)]
struct DoseLog {
    consumption: HashMap<UserId, Vec<ConsumptionRecord>>,
    missed: HashMap<UserId, Vec<MissedDose>>,
}

/// Append-only dose log kept in memory, partitioned by user.
#[derive(Default)]
pub struct InMemoryDoseLogRepository {
    log: RwLock<DoseLog>,
}

impl InMemoryDoseLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DoseLogRepositoryError {
    warn!("dose log lock poisoned");
    DoseLogRepositoryError::query("dose log lock poisoned")
}

#[async_trait]
impl DoseLogRepository for InMemoryDoseLogRepository {
    async fn append_consumption(
        &self,
        record: &ConsumptionRecord,
    ) -> Result<(), DoseLogRepositoryError> {
        let mut log = self.log.write().map_err(|_| poisoned())?;
        log.consumption
            .entry(record.user_id())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn list_consumption(
        &self,
        user_id: UserId,
        medicine_id: Option<MedicineId>,
    ) -> Result<Vec<ConsumptionRecord>, DoseLogRepositoryError> {
        let log = self.log.read().map_err(|_| poisoned())?;
        Ok(log
            .consumption
            .get(&user_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| medicine_id.is_none_or(|id| record.medicine_id() == id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn append_missed_dose(&self, dose: &MissedDose) -> Result<(), DoseLogRepositoryError> {
        let mut log = self.log.write().map_err(|_| poisoned())?;
        log.missed
            .entry(dose.user_id())
            .or_default()
            .push(dose.clone());
        Ok(())
    }

    async fn list_missed_doses(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MissedDose>, DoseLogRepositoryError> {
        let log = self.log.read().map_err(|_| poisoned())?;
        Ok(log.missed.get(&user_id).cloned().unwrap_or_default())
    }
}
