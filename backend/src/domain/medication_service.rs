//! Medication use cases.
//!
//! `MedicationService` implements both driving ports over the user aggregate
//! store and the dose log. Driven-port failures are mapped to domain errors
//! here so adapters never see storage details.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    DoseLogRepository, DoseLogRepositoryError, MedicationCommand, MedicationQuery,
    MedicationRepository, MedicationRepositoryError,
};
use crate::domain::schedule::{expires_within, overdue_doses};
use crate::domain::{
    AdherenceReport, ConsumptionRecord, Error, Medicine, MedicineDraft, MedicineId,
    MedicineUpdate, MissedDose, OverdueDose, Reminder, ReminderOffset, User, UserDraft, UserId,
};

fn map_medication_error(error: MedicationRepositoryError) -> Error {
    let message = error.to_string();
    match error {
        MedicationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("medication store unavailable: {message}"))
        }
        MedicationRepositoryError::Query { message } => {
            Error::internal(format!("medication store error: {message}"))
        }
        MedicationRepositoryError::UserNotFound { user_id } => {
            Error::not_found(message).with_details(json!({ "user_id": user_id }))
        }
        MedicationRepositoryError::MedicineNotFound {
            user_id,
            medicine_id,
        } => Error::not_found(message)
            .with_details(json!({ "user_id": user_id, "medicine_id": medicine_id })),
        MedicationRepositoryError::DuplicateUser { user_id } => {
            Error::conflict(message).with_details(json!({ "user_id": user_id }))
        }
        MedicationRepositoryError::DuplicateMedicine {
            user_id,
            medicine_id,
        } => Error::conflict(message)
            .with_details(json!({ "user_id": user_id, "medicine_id": medicine_id })),
        MedicationRepositoryError::IdsExhausted { .. } => Error::conflict(message),
        MedicationRepositoryError::Rejected { message } => Error::invalid_request(message),
    }
}

fn map_dose_log_error(error: DoseLogRepositoryError) -> Error {
    match error {
        DoseLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("dose log unavailable: {message}"))
        }
        DoseLogRepositoryError::Query { message } => {
            Error::internal(format!("dose log error: {message}"))
        }
    }
}

/// Medication service implementing [`MedicationCommand`] and
/// [`MedicationQuery`].
#[derive(Clone)]
pub struct MedicationService<M, D> {
    medications: Arc<M>,
    dose_log: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<M, D> MedicationService<M, D> {
    /// Create a service over the given stores and clock.
    pub fn new(medications: Arc<M>, dose_log: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            medications,
            dose_log,
            clock,
        }
    }
}

impl<M, D> MedicationService<M, D>
where
    M: MedicationRepository,
    D: DoseLogRepository,
{
    async fn require_user(&self, user_id: UserId) -> Result<User, Error> {
        self.medications
            .find_user(user_id)
            .await
            .map_err(map_medication_error)?
            .ok_or_else(|| map_medication_error(MedicationRepositoryError::user_not_found(user_id)))
    }

    /// Allocate a medicine id that no caller-supplied id in `reserved` uses.
    async fn fresh_medicine_id(&self, reserved: &[MedicineId]) -> Result<MedicineId, Error> {
        loop {
            let id = self
                .medications
                .next_medicine_id()
                .await
                .map_err(map_medication_error)?;
            if !reserved.contains(&id) {
                return Ok(id);
            }
        }
    }

    /// Resolve the medicine id, allocating one if needed, and validate.
    async fn build_medicine(&self, draft: MedicineDraft) -> Result<Medicine, Error> {
        let id = match draft.id {
            Some(id) => id,
            None => self
                .medications
                .next_medicine_id()
                .await
                .map_err(map_medication_error)?,
        };
        Medicine::new(id, draft).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "end_date", "code": "invalid_value" }))
        })
    }

    async fn require_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<Medicine, Error> {
        let user = self.require_user(user_id).await?;
        user.medicine(medicine_id).cloned().ok_or_else(|| {
            map_medication_error(MedicationRepositoryError::medicine_not_found(
                user_id,
                medicine_id,
            ))
        })
    }
}

#[async_trait]
impl<M, D> MedicationCommand for MedicationService<M, D>
where
    M: MedicationRepository,
    D: DoseLogRepository,
{
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let id = match draft.id {
            Some(id) => id,
            None => self
                .medications
                .next_user_id()
                .await
                .map_err(map_medication_error)?,
        };
        let mut user = User::new(id, draft.name, draft.email);
        let reserved: Vec<MedicineId> = draft.medicines.iter().filter_map(|m| m.id).collect();
        for mut medicine in draft.medicines {
            if medicine.id.is_none() {
                medicine.id = Some(self.fresh_medicine_id(&reserved).await?);
            }
            let medicine = self.build_medicine(medicine).await?;
            let medicine_id = medicine.id();
            user.add_medicine(medicine).map_err(|_| {
                map_medication_error(MedicationRepositoryError::duplicate_medicine(
                    id,
                    medicine_id,
                ))
            })?;
        }
        self.medications
            .insert_user(&user)
            .await
            .map_err(map_medication_error)?;
        info!(user_id = %id, medicines = user.medicines().len(), "user created");
        Ok(user)
    }

    async fn add_medicine(
        &self,
        user_id: UserId,
        draft: MedicineDraft,
    ) -> Result<Medicine, Error> {
        // Fail before consuming an id so unknown users do not burn the sequence.
        self.require_user(user_id).await?;
        let medicine = self.build_medicine(draft).await?;
        let id = medicine.id();
        self.medications
            .add_medicine(user_id, &medicine)
            .await
            .map_err(map_medication_error)?;
        info!(user_id = %user_id, medicine_id = %id, "medicine added");
        Ok(medicine)
    }

    async fn update_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
        update: MedicineUpdate,
    ) -> Result<Medicine, Error> {
        let medicine = self
            .medications
            .update_medicine(user_id, medicine_id, &update)
            .await
            .map_err(map_medication_error)?;
        info!(user_id = %user_id, medicine_id = %medicine_id, "medicine updated");
        Ok(medicine)
    }

    async fn delete_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<bool, Error> {
        let removed = self
            .medications
            .remove_medicine(user_id, medicine_id)
            .await
            .map_err(map_medication_error)?;
        info!(user_id = %user_id, medicine_id = %medicine_id, removed, "medicine delete handled");
        Ok(removed)
    }

    async fn track_consumption(
        &self,
        record: ConsumptionRecord,
    ) -> Result<ConsumptionRecord, Error> {
        self.require_medicine(record.user_id(), record.medicine_id())
            .await?;
        self.dose_log
            .append_consumption(&record)
            .await
            .map_err(map_dose_log_error)?;
        debug!(
            user_id = %record.user_id(),
            medicine_id = %record.medicine_id(),
            "consumption recorded"
        );
        Ok(record)
    }

    async fn record_missed_dose(&self, dose: MissedDose) -> Result<MissedDose, Error> {
        self.require_medicine(dose.user_id(), dose.medicine_id())
            .await?;
        self.dose_log
            .append_missed_dose(&dose)
            .await
            .map_err(map_dose_log_error)?;
        debug!(
            user_id = %dose.user_id(),
            medicine_id = %dose.medicine_id(),
            "missed dose recorded"
        );
        Ok(dose)
    }

    async fn set_reminder(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
        offset: ReminderOffset,
    ) -> Result<Reminder, Error> {
        let fire_at = offset.fire_at(self.clock.utc()).ok_or_else(|| {
            Error::invalid_request("reminder offset is out of range")
                .with_details(json!({ "code": "offset_out_of_range" }))
        })?;
        Ok(Reminder {
            user_id,
            medicine_id,
            offset,
            fire_at,
        })
    }
}

#[async_trait]
impl<M, D> MedicationQuery for MedicationService<M, D>
where
    M: MedicationRepository,
    D: DoseLogRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.medications
            .list_users()
            .await
            .map_err(map_medication_error)
    }

    async fn list_medicines(&self, user_id: UserId) -> Result<Vec<Medicine>, Error> {
        let user = self.require_user(user_id).await?;
        Ok(user.medicines().to_vec())
    }

    async fn get_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<Medicine, Error> {
        self.require_medicine(user_id, medicine_id).await
    }

    async fn list_consumption(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<Vec<ConsumptionRecord>, Error> {
        self.dose_log
            .list_consumption(user_id, Some(medicine_id))
            .await
            .map_err(map_dose_log_error)
    }

    async fn list_missed_doses(&self, user_id: UserId) -> Result<Vec<MissedDose>, Error> {
        self.dose_log
            .list_missed_doses(user_id)
            .await
            .map_err(map_dose_log_error)
    }

    async fn adherence(&self, user_id: UserId) -> Result<AdherenceReport, Error> {
        let medicines = self
            .medications
            .find_user(user_id)
            .await
            .map_err(map_medication_error)?
            .map_or(0, |user| user.medicines().len());
        let records = self
            .dose_log
            .list_consumption(user_id, None)
            .await
            .map_err(map_dose_log_error)?
            .len();
        Ok(AdherenceReport::new(user_id, medicines, records))
    }

    async fn search_medicines(
        &self,
        user_id: UserId,
        query: &str,
    ) -> Result<Vec<Medicine>, Error> {
        let user = self.require_user(user_id).await?;
        Ok(user.search_medicines(query))
    }

    async fn expiring_medicines(
        &self,
        user_id: UserId,
        window_days: i64,
    ) -> Result<Vec<Medicine>, Error> {
        let user = self.require_user(user_id).await?;
        let now = self.clock.utc();
        Ok(user
            .medicines()
            .iter()
            .filter(|medicine| expires_within(medicine, now, window_days))
            .cloned()
            .collect())
    }

    async fn list_reminders(&self, _user_id: UserId) -> Result<Vec<Reminder>, Error> {
        Ok(Vec::new())
    }

    async fn list_refill_reminders(&self) -> Result<Vec<User>, Error> {
        Ok(Vec::new())
    }

    async fn todays_doses(&self, user_id: UserId) -> Result<Vec<ConsumptionRecord>, Error> {
        let now = self.clock.utc();
        let records = self
            .dose_log
            .list_consumption(user_id, None)
            .await
            .map_err(map_dose_log_error)?;
        Ok(records
            .into_iter()
            .filter(|record| record.taken_on_day_of(now))
            .collect())
    }

    async fn overdue_doses(&self, user_id: UserId) -> Result<Vec<OverdueDose>, Error> {
        let user = self.require_user(user_id).await?;
        let now = self.clock.utc();
        let taken_today: Vec<ConsumptionRecord> = self
            .dose_log
            .list_consumption(user_id, None)
            .await
            .map_err(map_dose_log_error)?
            .into_iter()
            .filter(|record| record.taken_on_day_of(now))
            .collect();
        Ok(overdue_doses(user.medicines(), &taken_today, now))
    }
}

#[cfg(test)]
#[path = "medication_service_tests.rs"]
mod tests;
