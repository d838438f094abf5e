//! Port for the append-only consumption and missed-dose logs.

use async_trait::async_trait;

use crate::domain::{ConsumptionRecord, MedicineId, MissedDose, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by dose log adapters.
    pub enum DoseLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "dose log connection failed: {message}",
        /// Query or append failed during execution.
        Query { message: String } =>
            "dose log query failed: {message}",
    }
}

/// Port for appending and reading dose log entries.
///
/// Reads never fail for unknown ids; they return empty lists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoseLogRepository: Send + Sync {
    async fn append_consumption(
        &self,
        record: &ConsumptionRecord,
    ) -> Result<(), DoseLogRepositoryError>;

    /// Consumption records for a user in append order, optionally narrowed to
    /// one medicine.
    async fn list_consumption(
        &self,
        user_id: UserId,
        medicine_id: Option<MedicineId>,
    ) -> Result<Vec<ConsumptionRecord>, DoseLogRepositoryError>;

    async fn append_missed_dose(&self, dose: &MissedDose) -> Result<(), DoseLogRepositoryError>;

    /// Missed doses for a user in append order.
    async fn list_missed_doses(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MissedDose>, DoseLogRepositoryError>;
}
