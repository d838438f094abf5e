//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, which keeps them testable without any storage.

use std::sync::Arc;

use crate::domain::ports::{MedicationCommand, MedicationQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub commands: Arc<dyn MedicationCommand>,
    pub queries: Arc<dyn MedicationQuery>,
}

impl HttpState {
    /// Construct state from the write and read ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use medtrack::domain::MedicationService;
    /// use medtrack::inbound::http::state::HttpState;
    /// use medtrack::outbound::persistence::{
    ///     InMemoryDoseLogRepository, InMemoryMedicationRepository,
    /// };
    ///
    /// let service = Arc::new(MedicationService::new(
    ///     Arc::new(InMemoryMedicationRepository::new()),
    ///     Arc::new(InMemoryDoseLogRepository::new()),
    ///     Arc::new(mockable::DefaultClock),
    /// ));
    /// let state = HttpState::new(service.clone(), service);
    /// let _queries = state.queries.clone();
    /// ```
    pub fn new(commands: Arc<dyn MedicationCommand>, queries: Arc<dyn MedicationQuery>) -> Self {
        Self { commands, queries }
    }
}
