//! Dose log handlers: taken and missed doses, and what they say about a user.
//!
//! ```text
//! POST /users/{user_id}/medicines/{medicine_id}/track
//! GET  /users/{user_id}/medicines/{medicine_id}/track
//! POST /users/{user_id}/medicines/{medicine_id}/missed-dose
//! GET  /users/{user_id}/missed-doses/
//! GET  /users/{user_id}/adherence/
//! GET  /users/{user_id}/medicines/today/
//! GET  /users/{user_id}/medicines/overdue/
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    ConsumptionRecordBody, ConsumptionRequest, MedicinePath, MessageResponse, MissedDoseBody,
    MissedDoseRequest, OverdueDoseBody, UserPath,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackConsumptionResponse {
    pub msg: String,
    pub record: ConsumptionRecordBody,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MissedDosesResponse {
    pub msg: String,
    pub missed_doses: Vec<MissedDoseBody>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdherenceResponse {
    /// `User adherence rate: <rate>%`, one decimal place.
    pub msg: String,
    /// Consumption records per medicine, in percent. Not capped at 100.
    pub rate: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodayDosesResponse {
    pub msg: String,
    pub medicines: Vec<ConsumptionRecordBody>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverdueDosesResponse {
    pub msg: String,
    pub medicines: Vec<OverdueDoseBody>,
}

/// Record that a dose was taken.
#[utoipa::path(
    post,
    path = "/users/{user_id}/medicines/{medicine_id}/track",
    request_body = ConsumptionRequest,
    params(
        ("user_id" = i64, Path, description = "User identifier"),
        ("medicine_id" = i64, Path, description = "Medicine identifier")
    ),
    responses(
        (status = 200, description = "Consumption recorded", body = TrackConsumptionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User or medicine not found", body = ErrorSchema)
    ),
    tags = ["doses"],
    operation_id = "trackConsumption"
)]
#[post("/users/{user_id}/medicines/{medicine_id}/track")]
pub async fn track_consumption(
    state: web::Data<HttpState>,
    path: web::Path<MedicinePath>,
    payload: web::Json<ConsumptionRequest>,
) -> ApiResult<web::Json<TrackConsumptionResponse>> {
    let (user_id, medicine_id) = path.into_inner().parse()?;
    let record = payload.into_inner().into_record(user_id, medicine_id)?;
    let record = state.commands.track_consumption(record).await?;
    Ok(web::Json(TrackConsumptionResponse {
        msg: "Consumption tracked successfully".to_owned(),
        record: record.into(),
    }))
}

/// Consumption records for one medicine, oldest first. Unknown ids read as empty.
#[utoipa::path(
    get,
    path = "/users/{user_id}/medicines/{medicine_id}/track",
    params(
        ("user_id" = i64, Path, description = "User identifier"),
        ("medicine_id" = i64, Path, description = "Medicine identifier")
    ),
    responses(
        (status = 200, description = "Consumption records", body = [ConsumptionRecordBody]),
        (status = 400, description = "Invalid identifier", body = ErrorSchema)
    ),
    tags = ["doses"],
    operation_id = "listConsumption"
)]
#[get("/users/{user_id}/medicines/{medicine_id}/track")]
pub async fn list_consumption(
    state: web::Data<HttpState>,
    path: web::Path<MedicinePath>,
) -> ApiResult<web::Json<Vec<ConsumptionRecordBody>>> {
    let (user_id, medicine_id) = path.into_inner().parse()?;
    let records = state
        .queries
        .list_consumption(user_id, medicine_id)
        .await?;
    Ok(web::Json(
        records.into_iter().map(ConsumptionRecordBody::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/medicines/{medicine_id}/missed-dose",
    request_body = MissedDoseRequest,
    params(
        ("user_id" = i64, Path, description = "User identifier"),
        ("medicine_id" = i64, Path, description = "Medicine identifier")
    ),
    responses(
        (status = 200, description = "Missed dose recorded", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User or medicine not found", body = ErrorSchema)
    ),
    tags = ["doses"],
    operation_id = "recordMissedDose"
)]
#[post("/users/{user_id}/medicines/{medicine_id}/missed-dose")]
pub async fn record_missed_dose(
    state: web::Data<HttpState>,
    path: web::Path<MedicinePath>,
    payload: web::Json<MissedDoseRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let (user_id, medicine_id) = path.into_inner().parse()?;
    let dose = payload
        .into_inner()
        .into_missed_dose(user_id, medicine_id)?;
    state.commands.record_missed_dose(dose).await?;
    Ok(web::Json(MessageResponse::new(
        "Missed dose recorded successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/missed-doses/",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Missed doses", body = MissedDosesResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema)
    ),
    tags = ["doses"],
    operation_id = "listMissedDoses"
)]
#[get("/users/{user_id}/missed-doses/")]
pub async fn list_missed_doses(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<MissedDosesResponse>> {
    let user_id = path.into_inner().parse()?;
    let doses = state.queries.list_missed_doses(user_id).await?;
    Ok(web::Json(MissedDosesResponse {
        msg: "Missed doses".to_owned(),
        missed_doses: doses.into_iter().map(MissedDoseBody::from).collect(),
    }))
}

/// Adherence rate: consumption records per medicine, as a percentage.
#[utoipa::path(
    get,
    path = "/users/{user_id}/adherence/",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Adherence rate", body = AdherenceResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema)
    ),
    tags = ["doses"],
    operation_id = "getAdherence"
)]
#[get("/users/{user_id}/adherence/")]
pub async fn adherence(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<AdherenceResponse>> {
    let user_id = path.into_inner().parse()?;
    let report = state.queries.adherence(user_id).await?;
    Ok(web::Json(AdherenceResponse {
        msg: report.message(),
        rate: report.rate.percent(),
    }))
}

/// Doses recorded today (UTC).
#[utoipa::path(
    get,
    path = "/users/{user_id}/medicines/today/",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Doses taken today", body = TodayDosesResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema)
    ),
    tags = ["doses"],
    operation_id = "listTodayDoses"
)]
#[get("/users/{user_id}/medicines/today/")]
pub async fn todays_doses(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<TodayDosesResponse>> {
    let user_id = path.into_inner().parse()?;
    let records = state.queries.todays_doses(user_id).await?;
    Ok(web::Json(TodayDosesResponse {
        msg: "Medicines for today".to_owned(),
        medicines: records.into_iter().map(ConsumptionRecordBody::from).collect(),
    }))
}

/// Scheduled dose slots for today that are due but not covered by a record.
#[utoipa::path(
    get,
    path = "/users/{user_id}/medicines/overdue/",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Overdue doses", body = OverdueDosesResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["doses"],
    operation_id = "listOverdueDoses"
)]
#[get("/users/{user_id}/medicines/overdue/")]
pub async fn overdue_doses(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<OverdueDosesResponse>> {
    let user_id = path.into_inner().parse()?;
    let overdue = state.queries.overdue_doses(user_id).await?;
    Ok(web::Json(OverdueDosesResponse {
        msg: "Overdue medicines".to_owned(),
        medicines: overdue.into_iter().map(OverdueDoseBody::from).collect(),
    }))
}

#[cfg(test)]
#[path = "doses_tests.rs"]
mod tests;
