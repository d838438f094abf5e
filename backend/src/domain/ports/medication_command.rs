//! Driving port for medication mutations.
//!
//! Inbound adapters hand validated domain values to this port; identifier
//! allocation, existence checks and persistence happen behind it.

use async_trait::async_trait;

use crate::domain::{
    ConsumptionRecord, Error, Medicine, MedicineDraft, MedicineId, MedicineUpdate, MissedDose,
    Reminder, ReminderOffset, User, UserDraft, UserId,
};

/// Domain use-case port for writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicationCommand: Send + Sync {
    /// Register a user, assigning an id when the draft carries none.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Append a medicine to an existing user.
    async fn add_medicine(&self, user_id: UserId, draft: MedicineDraft)
    -> Result<Medicine, Error>;

    /// Apply a partial update atomically.
    async fn update_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
        update: MedicineUpdate,
    ) -> Result<Medicine, Error>;

    /// Remove a medicine; `Ok(false)` when the user exists but the medicine
    /// does not.
    async fn delete_medicine(&self, user_id: UserId, medicine_id: MedicineId)
    -> Result<bool, Error>;

    /// Log a dose taken against an existing user and medicine.
    async fn track_consumption(&self, record: ConsumptionRecord)
    -> Result<ConsumptionRecord, Error>;

    /// Log a skipped dose against an existing user and medicine.
    async fn record_missed_dose(&self, dose: MissedDose) -> Result<MissedDose, Error>;

    /// Compute `now + offset`. Nothing is stored.
    async fn set_reminder(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
        offset: ReminderOffset,
    ) -> Result<Reminder, Error>;
}
