//! In-memory persistence adapters.
//!
//! State is process-local and lost on restart. The adapters implement the
//! driven ports so a durable store can replace them without touching the
//! domain.

mod in_memory_dose_log_repository;
mod in_memory_medication_repository;

pub use in_memory_dose_log_repository::InMemoryDoseLogRepository;
pub use in_memory_medication_repository::InMemoryMedicationRepository;
