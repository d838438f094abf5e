//! Medicine handlers scoped to a user.
//!
//! ```text
//! POST   /users/{user_id}/medicines/
//! GET    /users/{user_id}/medicines/
//! GET    /users/{user_id}/medicines/search/?query=asp
//! GET    /users/{user_id}/medicines/expiring/?days=7
//! GET    /users/{user_id}/medicines/{medicine_id}
//! PUT    /users/{user_id}/medicines/{medicine_id}
//! DELETE /users/{user_id}/medicines/{medicine_id}
//! ```

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::DEFAULT_EXPIRY_WINDOW_DAYS;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    MedicineBody, MedicinePath, MedicineRequest, UpdateMedicineRequest, UserPath,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Acknowledgement carrying the stored medicine.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MedicineResponse {
    pub msg: String,
    pub medicine: MedicineBody,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteMedicineResponse {
    pub msg: String,
    /// Whether a medicine with the id existed.
    pub removed: bool,
}

/// Message plus a filtered medicine list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MedicineListResponse {
    pub msg: String,
    pub medicines: Vec<MedicineBody>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the medicine name.
    pub query: String,
}

fn default_window() -> i64 {
    DEFAULT_EXPIRY_WINDOW_DAYS
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpiringQuery {
    /// Window in whole days; already expired medicines are included.
    #[serde(default = "default_window")]
    #[param(default = 7)]
    pub days: i64,
}

/// Attach a medicine to a user.
#[utoipa::path(
    post,
    path = "/users/{user_id}/medicines/",
    request_body = MedicineRequest,
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Medicine added", body = MedicineResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 409, description = "Medicine id already used by this user", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "addMedicine"
)]
#[post("/users/{user_id}/medicines/")]
pub async fn add_medicine(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
    payload: web::Json<MedicineRequest>,
) -> ApiResult<web::Json<MedicineResponse>> {
    let user_id = path.into_inner().parse()?;
    let draft = payload.into_inner().into_draft()?;
    let medicine = state.commands.add_medicine(user_id, draft).await?;
    Ok(web::Json(MedicineResponse {
        msg: "Medicine added successfully".to_owned(),
        medicine: medicine.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/medicines/",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user's medicines", body = [MedicineBody]),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "listMedicines"
)]
#[get("/users/{user_id}/medicines/")]
pub async fn list_medicines(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<Vec<MedicineBody>>> {
    let user_id = path.into_inner().parse()?;
    let medicines = state.queries.list_medicines(user_id).await?;
    Ok(web::Json(medicines.into_iter().map(MedicineBody::from).collect()))
}

/// Search a user's medicines by name.
#[utoipa::path(
    get,
    path = "/users/{user_id}/medicines/search/",
    params(("user_id" = i64, Path, description = "User identifier"), SearchQuery),
    responses(
        (status = 200, description = "Matching medicines", body = MedicineListResponse),
        (status = 400, description = "Missing query", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "searchMedicines"
)]
#[get("/users/{user_id}/medicines/search/")]
pub async fn search_medicines(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<MedicineListResponse>> {
    let user_id = path.into_inner().parse()?;
    let medicines = state
        .queries
        .search_medicines(user_id, &query.into_inner().query)
        .await?;
    Ok(web::Json(MedicineListResponse {
        msg: "Search results".to_owned(),
        medicines: medicines.into_iter().map(MedicineBody::from).collect(),
    }))
}

/// Medicines whose end date falls within the window.
#[utoipa::path(
    get,
    path = "/users/{user_id}/medicines/expiring/",
    params(("user_id" = i64, Path, description = "User identifier"), ExpiringQuery),
    responses(
        (status = 200, description = "Expiring medicines", body = MedicineListResponse),
        (status = 400, description = "Invalid window", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "listExpiringMedicines"
)]
#[get("/users/{user_id}/medicines/expiring/")]
pub async fn expiring_medicines(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
    query: web::Query<ExpiringQuery>,
) -> ApiResult<web::Json<MedicineListResponse>> {
    let user_id = path.into_inner().parse()?;
    let medicines = state
        .queries
        .expiring_medicines(user_id, query.days)
        .await?;
    Ok(web::Json(MedicineListResponse {
        msg: "Expiring medicines".to_owned(),
        medicines: medicines.into_iter().map(MedicineBody::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/medicines/{medicine_id}",
    params(
        ("user_id" = i64, Path, description = "User identifier"),
        ("medicine_id" = i64, Path, description = "Medicine identifier")
    ),
    responses(
        (status = 200, description = "The medicine", body = MedicineBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "User or medicine not found", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "getMedicine"
)]
#[get("/users/{user_id}/medicines/{medicine_id}")]
pub async fn get_medicine(
    state: web::Data<HttpState>,
    path: web::Path<MedicinePath>,
) -> ApiResult<web::Json<MedicineBody>> {
    let (user_id, medicine_id) = path.into_inner().parse()?;
    let medicine = state.queries.get_medicine(user_id, medicine_id).await?;
    Ok(web::Json(medicine.into()))
}

/// Partially update a medicine.
///
/// Absent fields are kept, `null` clears `end_date` or `notes`.
#[utoipa::path(
    put,
    path = "/users/{user_id}/medicines/{medicine_id}",
    request_body = UpdateMedicineRequest,
    params(
        ("user_id" = i64, Path, description = "User identifier"),
        ("medicine_id" = i64, Path, description = "Medicine identifier")
    ),
    responses(
        (status = 200, description = "Medicine updated", body = MedicineResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "User or medicine not found", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "updateMedicine"
)]
#[put("/users/{user_id}/medicines/{medicine_id}")]
pub async fn update_medicine(
    state: web::Data<HttpState>,
    path: web::Path<MedicinePath>,
    payload: web::Json<UpdateMedicineRequest>,
) -> ApiResult<web::Json<MedicineResponse>> {
    let (user_id, medicine_id) = path.into_inner().parse()?;
    let update = payload.into_inner().into_update()?;
    let medicine = state
        .commands
        .update_medicine(user_id, medicine_id, update)
        .await?;
    Ok(web::Json(MedicineResponse {
        msg: "Medicine updated successfully".to_owned(),
        medicine: medicine.into(),
    }))
}

/// Remove a medicine; succeeds for unknown medicine ids of a known user.
#[utoipa::path(
    delete,
    path = "/users/{user_id}/medicines/{medicine_id}",
    params(
        ("user_id" = i64, Path, description = "User identifier"),
        ("medicine_id" = i64, Path, description = "Medicine identifier")
    ),
    responses(
        (status = 200, description = "Delete handled", body = DeleteMedicineResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "deleteMedicine"
)]
#[delete("/users/{user_id}/medicines/{medicine_id}")]
pub async fn delete_medicine(
    state: web::Data<HttpState>,
    path: web::Path<MedicinePath>,
) -> ApiResult<web::Json<DeleteMedicineResponse>> {
    let (user_id, medicine_id) = path.into_inner().parse()?;
    let removed = state
        .commands
        .delete_medicine(user_id, medicine_id)
        .await?;
    Ok(web::Json(DeleteMedicineResponse {
        msg: "Medicine deleted successfully".to_owned(),
        removed,
    }))
}

#[cfg(test)]
#[path = "medicines_tests.rs"]
mod tests;
