//! User registration handlers.
//!
//! ```text
//! POST /users/ {"name":"Ada","email":"ada@example.com"}
//! GET /users/
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CreateUserRequest, UserBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    pub msg: String,
    pub user: UserBody,
}

/// Register a user, optionally with an initial medicine list.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "User or medicine id already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users/")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<web::Json<CreateUserResponse>> {
    let draft = payload.into_inner().into_draft()?;
    let user = state.commands.create_user(draft).await?;
    Ok(web::Json(CreateUserResponse {
        msg: "User created successfully".to_owned(),
        user: UserBody::from(user),
    }))
}

/// List every registered user in registration order.
#[utoipa::path(
    get,
    path = "/users/",
    responses(
        (status = 200, description = "Registered users", body = [UserBody]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users/")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserBody>>> {
    let users = state.queries.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserBody::from).collect()))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
