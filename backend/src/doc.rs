//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every medication endpoint, the health probes and the
//! request/response bodies. Domain types stay free of utoipa derives; the
//! error envelope is described by wrappers in
//! [`crate::inbound::http::schemas`].
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::OpenApi;

use crate::inbound::http::doses::{
    AdherenceResponse, MissedDosesResponse, OverdueDosesResponse, TodayDosesResponse,
    TrackConsumptionResponse,
};
use crate::inbound::http::dto::{
    ConsumptionRecordBody, ConsumptionRequest, CreateUserRequest, MedicineBody, MedicineRequest,
    MessageResponse, MissedDoseBody, MissedDoseRequest, OverdueDoseBody, UpdateMedicineRequest,
    UserBody,
};
use crate::inbound::http::medicines::{
    DeleteMedicineResponse, MedicineListResponse, MedicineResponse,
};
use crate::inbound::http::reminders::{
    RefillReminderResponse, RefillRemindersResponse, ReminderBody, ReminderResponse,
    RemindersResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::CreateUserResponse;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Medication tracking API",
        description = "Users, their medicines, dose logs and adherence statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::medicines::add_medicine,
        crate::inbound::http::medicines::list_medicines,
        crate::inbound::http::medicines::get_medicine,
        crate::inbound::http::medicines::update_medicine,
        crate::inbound::http::medicines::delete_medicine,
        crate::inbound::http::medicines::search_medicines,
        crate::inbound::http::medicines::expiring_medicines,
        crate::inbound::http::doses::track_consumption,
        crate::inbound::http::doses::list_consumption,
        crate::inbound::http::doses::record_missed_dose,
        crate::inbound::http::doses::list_missed_doses,
        crate::inbound::http::doses::adherence,
        crate::inbound::http::doses::todays_doses,
        crate::inbound::http::doses::overdue_doses,
        crate::inbound::http::reminders::set_reminder,
        crate::inbound::http::reminders::set_refill_reminder,
        crate::inbound::http::reminders::list_reminders,
        crate::inbound::http::reminders::list_refill_reminders,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserBody,
        MedicineBody,
        ConsumptionRecordBody,
        MissedDoseBody,
        OverdueDoseBody,
        ReminderBody,
        CreateUserRequest,
        MedicineRequest,
        UpdateMedicineRequest,
        ConsumptionRequest,
        MissedDoseRequest,
        MessageResponse,
        CreateUserResponse,
        MedicineResponse,
        DeleteMedicineResponse,
        MedicineListResponse,
        TrackConsumptionResponse,
        MissedDosesResponse,
        AdherenceResponse,
        TodayDosesResponse,
        OverdueDosesResponse,
        ReminderResponse,
        RefillReminderResponse,
        RemindersResponse,
        RefillRemindersResponse,
    )),
    tags(
        (name = "users", description = "User registration"),
        (name = "medicines", description = "Medicines owned by a user"),
        (name = "doses", description = "Dose logs and adherence"),
        (name = "reminders", description = "Computed reminder times"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
