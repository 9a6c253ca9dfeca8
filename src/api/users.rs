//! User management endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
    AppState,
};

use super::{AuthenticatedUser, JsonBody};

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input or username taken"),
        (status = 403, description = "Superuser required")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<JsonBody<CreateUser>, AppError>,
) -> AppResult<(StatusCode, Json<User>)> {
    claims.require_superuser()?;
    let JsonBody(user) = payload?;

    let created = state.services.users.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
