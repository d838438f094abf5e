//! Driving port for medication reads and reports.

use async_trait::async_trait;

use crate::domain::{
    AdherenceReport, ConsumptionRecord, Error, Medicine, MedicineId, MissedDose, OverdueDose,
    Reminder, User, UserId,
};

/// Domain use-case port for reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicationQuery: Send + Sync {
    /// All users in creation order.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Medicines of one user; `not_found` for an unknown user.
    async fn list_medicines(&self, user_id: UserId) -> Result<Vec<Medicine>, Error>;

    /// One medicine; distinct `not_found` messages for user and medicine.
    async fn get_medicine(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<Medicine, Error>;

    /// Consumption records for the pair, empty for unknown ids.
    async fn list_consumption(
        &self,
        user_id: UserId,
        medicine_id: MedicineId,
    ) -> Result<Vec<ConsumptionRecord>, Error>;

    /// Missed doses for the user, empty for unknown ids.
    async fn list_missed_doses(&self, user_id: UserId) -> Result<Vec<MissedDose>, Error>;

    /// Adherence figures; zero for unknown users.
    async fn adherence(&self, user_id: UserId) -> Result<AdherenceReport, Error>;

    /// Case-insensitive name search within one user's medicines.
    async fn search_medicines(&self, user_id: UserId, query: &str)
    -> Result<Vec<Medicine>, Error>;

    /// Medicines whose course ends within `window_days`.
    async fn expiring_medicines(
        &self,
        user_id: UserId,
        window_days: i64,
    ) -> Result<Vec<Medicine>, Error>;

    /// Stored dose reminders. Reminders are never stored, so this is empty.
    async fn list_reminders(&self, user_id: UserId) -> Result<Vec<Reminder>, Error>;

    /// Users due a refill. Refill reminders are never stored, so this is empty.
    async fn list_refill_reminders(&self) -> Result<Vec<User>, Error>;

    /// Consumption records logged today (UTC).
    async fn todays_doses(&self, user_id: UserId) -> Result<Vec<ConsumptionRecord>, Error>;

    /// Due dose slots today that no record covers.
    async fn overdue_doses(&self, user_id: UserId) -> Result<Vec<OverdueDose>, Error>;
}
