//! Builders wiring the in-memory adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use medtrack::domain::MedicationService;
use medtrack::inbound::http::state::HttpState;
use medtrack::outbound::persistence::{InMemoryDoseLogRepository, InMemoryMedicationRepository};

/// Build the medication service over fresh in-memory stores.
///
/// One service instance backs both driving ports so commands and queries see
/// the same state.
pub(crate) fn build_http_state() -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let service = Arc::new(MedicationService::new(
        Arc::new(InMemoryMedicationRepository::new()),
        Arc::new(InMemoryDoseLogRepository::new()),
        clock,
    ));
    info!("medication state initialised with in-memory stores");
    web::Data::new(HttpState::new(service.clone(), service))
}

