//! Domain primitives, aggregates and use cases.
//!
//! Purpose: Define strongly typed entities for users, medicines and dose logs,
//! the calculations run over them, and the service that implements the
//! driving ports. Types here know nothing about HTTP or storage.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport agnostic error payload.
//! - User / Medicine: the user aggregate and the medicines it owns.
//! - ConsumptionRecord / MissedDose: append-only dose log entries.
//! - MedicationService: implementation of the driving ports.

pub mod adherence;
pub mod dose;
pub mod error;
pub mod medicine;
pub mod ports;
pub mod reminder;
pub mod schedule;
pub mod trace_id;
pub mod user;

mod medication_service;

pub use self::adherence::{AdherenceRate, AdherenceReport};
pub use self::dose::{ConsumptionRecord, MissedDose};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::medicine::{
    Dosage, DosesPerDay, FieldUpdate, Medicine, MedicineDraft, MedicineId, MedicineName,
    MedicineUpdate, MedicineValidationError,
};
pub use self::medication_service::MedicationService;
pub use self::reminder::{Reminder, ReminderOffset};
pub use self::schedule::{DEFAULT_EXPIRY_WINDOW_DAYS, OverdueDose};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, MedicineListError, User, UserDraft, UserId, UserName, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use medtrack::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
