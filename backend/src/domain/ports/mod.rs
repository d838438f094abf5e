//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod dose_log_repository;
mod medication_command;
mod medication_query;
mod medication_repository;

#[cfg(test)]
pub use dose_log_repository::MockDoseLogRepository;
pub use dose_log_repository::{DoseLogRepository, DoseLogRepositoryError};
#[cfg(test)]
pub use medication_command::MockMedicationCommand;
pub use medication_command::MedicationCommand;
#[cfg(test)]
pub use medication_query::MockMedicationQuery;
pub use medication_query::MedicationQuery;
#[cfg(test)]
pub use medication_repository::MockMedicationRepository;
pub use medication_repository::{MedicationRepository, MedicationRepositoryError};
