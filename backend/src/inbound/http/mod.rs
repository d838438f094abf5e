//! HTTP inbound adapter exposing REST endpoints.

pub mod doses;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod health;
pub mod medicines;
pub mod reminders;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the medication routes and extractor error handlers.
///
/// Fixed segments such as `search/` are registered ahead of
/// `{medicine_id}` so they are never captured as identifiers.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use medtrack::inbound::http::{configure, state::HttpState};
///
/// fn app(state: HttpState) {
///     let _app = App::new()
///         .app_data(web::Data::new(state))
///         .configure(configure);
/// }
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(extractors::json_config())
        .app_data(extractors::path_config())
        .app_data(extractors::query_config())
        .service(reminders::list_refill_reminders)
        .service(users::create_user)
        .service(users::list_users)
        .service(medicines::search_medicines)
        .service(medicines::expiring_medicines)
        .service(doses::overdue_doses)
        .service(doses::todays_doses)
        .service(medicines::add_medicine)
        .service(medicines::list_medicines)
        .service(medicines::get_medicine)
        .service(medicines::update_medicine)
        .service(medicines::delete_medicine)
        .service(doses::track_consumption)
        .service(doses::list_consumption)
        .service(doses::record_missed_dose)
        .service(doses::list_missed_doses)
        .service(doses::adherence)
        .service(reminders::set_reminder)
        .service(reminders::set_refill_reminder)
        .service(reminders::list_reminders);
}
