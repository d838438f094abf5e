//! Reminder handlers.
//!
//! Reminders are computed, never stored or delivered: setting one echoes the
//! instant it would fire and the list endpoints stay empty.

use actix_web::{get, post, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Reminder, ReminderOffset};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{MedicinePath, UserBody, UserPath};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReminderQuery {
    /// Hours from now until the reminder fires.
    pub hours_before: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RefillReminderQuery {
    /// Days from now until the refill reminder fires.
    pub days_before: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReminderResponse {
    pub msg: String,
    pub remind_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefillReminderResponse {
    pub msg: String,
    pub refill_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReminderBody {
    pub medicine_id: i64,
    pub remind_at: DateTime<Utc>,
}

impl From<Reminder> for ReminderBody {
    fn from(value: Reminder) -> Self {
        Self {
            medicine_id: value.medicine_id.get(),
            remind_at: value.fire_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemindersResponse {
    pub msg: String,
    pub reminders: Vec<ReminderBody>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefillRemindersResponse {
    pub msg: String,
    pub users: Vec<UserBody>,
}

fn stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Compute when a dose reminder would fire.
#[utoipa::path(
    post,
    path = "/users/{user_id}/medicines/{medicine_id}/reminder",
    params(
        ("user_id" = i64, Path, description = "User identifier"),
        ("medicine_id" = i64, Path, description = "Medicine identifier"),
        ReminderQuery
    ),
    responses(
        (status = 200, description = "Reminder time", body = ReminderResponse),
        (status = 400, description = "Missing or out of range offset", body = ErrorSchema)
    ),
    tags = ["reminders"],
    operation_id = "setReminder"
)]
#[post("/users/{user_id}/medicines/{medicine_id}/reminder")]
pub async fn set_reminder(
    state: web::Data<HttpState>,
    path: web::Path<MedicinePath>,
    query: web::Query<ReminderQuery>,
) -> ApiResult<web::Json<ReminderResponse>> {
    let (user_id, medicine_id) = path.into_inner().parse()?;
    let reminder = state
        .commands
        .set_reminder(
            user_id,
            medicine_id,
            ReminderOffset::Hours(query.hours_before),
        )
        .await?;
    Ok(web::Json(ReminderResponse {
        msg: format!("Reminder set for {}", stamp(reminder.fire_at)),
        remind_at: reminder.fire_at,
    }))
}

/// Compute when a refill reminder would fire.
#[utoipa::path(
    post,
    path = "/users/{user_id}/medicines/{medicine_id}/refill-reminder",
    params(
        ("user_id" = i64, Path, description = "User identifier"),
        ("medicine_id" = i64, Path, description = "Medicine identifier"),
        RefillReminderQuery
    ),
    responses(
        (status = 200, description = "Refill reminder time", body = RefillReminderResponse),
        (status = 400, description = "Missing or out of range offset", body = ErrorSchema)
    ),
    tags = ["reminders"],
    operation_id = "setRefillReminder"
)]
#[post("/users/{user_id}/medicines/{medicine_id}/refill-reminder")]
pub async fn set_refill_reminder(
    state: web::Data<HttpState>,
    path: web::Path<MedicinePath>,
    query: web::Query<RefillReminderQuery>,
) -> ApiResult<web::Json<RefillReminderResponse>> {
    let (user_id, medicine_id) = path.into_inner().parse()?;
    let reminder = state
        .commands
        .set_reminder(user_id, medicine_id, ReminderOffset::Days(query.days_before))
        .await?;
    Ok(web::Json(RefillReminderResponse {
        msg: format!("Refill reminder set for {}", stamp(reminder.fire_at)),
        refill_at: reminder.fire_at,
    }))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/reminders/",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Stored reminders", body = RemindersResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema)
    ),
    tags = ["reminders"],
    operation_id = "listReminders"
)]
#[get("/users/{user_id}/reminders/")]
pub async fn list_reminders(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<RemindersResponse>> {
    let user_id = path.into_inner().parse()?;
    let reminders = state.queries.list_reminders(user_id).await?;
    Ok(web::Json(RemindersResponse {
        msg: "List of reminders".to_owned(),
        reminders: reminders.into_iter().map(ReminderBody::from).collect(),
    }))
}

/// Users due a refill.
#[utoipa::path(
    get,
    path = "/users/refill-reminders/",
    responses(
        (status = 200, description = "Users needing a refill", body = RefillRemindersResponse)
    ),
    tags = ["reminders"],
    operation_id = "listRefillReminders"
)]
#[get("/users/refill-reminders/")]
pub async fn list_refill_reminders(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<RefillRemindersResponse>> {
    let users = state.queries.list_refill_reminders().await?;
    Ok(web::Json(RefillRemindersResponse {
        msg: "List of users who need refills".to_owned(),
        users: users.into_iter().map(UserBody::from).collect(),
    }))
}
