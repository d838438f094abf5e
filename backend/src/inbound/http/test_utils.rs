//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{TimeZone, Utc};

use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::test_support::{MutableClock, in_memory_state};

/// Clock pinned to 2024-06-10T12:00:00Z.
pub fn test_clock() -> Arc<MutableClock> {
    let now = Utc
        .with_ymd_and_hms(2024, 6, 10, 12, 0, 0)
        .single()
        .expect("valid test instant");
    Arc::new(MutableClock::new(now))
}

/// App wired exactly like production routes over the given state.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(configure)
}

/// Fresh in-memory state plus the clock driving it.
pub fn fresh_state() -> (HttpState, Arc<MutableClock>) {
    let clock = test_clock();
    (in_memory_state(clock.clone()), clock)
}
