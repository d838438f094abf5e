//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Only compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::MedicationService;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{InMemoryDoseLogRepository, InMemoryMedicationRepository};

/// Clock whose current instant is set by the test.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    pub fn advance_hours(&self, hours: i64) {
        *self.lock_clock() += TimeDelta::hours(hours);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// HTTP state backed by fresh in-memory stores and the given clock.
pub fn in_memory_state(clock: Arc<dyn Clock>) -> HttpState {
    let service = Arc::new(MedicationService::new(
        Arc::new(InMemoryMedicationRepository::new()),
        Arc::new(InMemoryDoseLogRepository::new()),
        clock,
    ));
    HttpState::new(service.clone(), service)
}
