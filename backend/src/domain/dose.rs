//! Append-only dose log entries.

use chrono::{DateTime, Utc};

use crate::domain::{MedicineId, UserId};

/// A dose the user reports having taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumptionRecord {
    user_id: UserId,
    medicine_id: MedicineId,
    time_taken: DateTime<Utc>,
    notes: Option<String>,
}

impl ConsumptionRecord {
    pub fn new(
        user_id: UserId,
        medicine_id: MedicineId,
        time_taken: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            user_id,
            medicine_id,
            time_taken,
            notes,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn medicine_id(&self) -> MedicineId {
        self.medicine_id
    }

    pub fn time_taken(&self) -> DateTime<Utc> {
        self.time_taken
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Whether the dose was taken on the same UTC calendar day as `now`.
    pub fn taken_on_day_of(&self, now: DateTime<Utc>) -> bool {
        self.time_taken.date_naive() == now.date_naive()
    }
}

/// A dose the user reports having skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedDose {
    user_id: UserId,
    medicine_id: MedicineId,
    time_missed: DateTime<Utc>,
    reason: Option<String>,
}

impl MissedDose {
    pub fn new(
        user_id: UserId,
        medicine_id: MedicineId,
        time_missed: DateTime<Utc>,
        reason: Option<String>,
    ) -> Self {
        Self {
            user_id,
            medicine_id,
            time_missed,
            reason,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn medicine_id(&self) -> MedicineId {
        self.medicine_id
    }

    pub fn time_missed(&self) -> DateTime<Utc> {
        self.time_missed
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}
