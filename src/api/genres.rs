//! Genre endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::Redirect,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        genre::{CreateGenre, Genre},
        permission::Permission,
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody, Path};

/// List genres by name
#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    responses(
        (status = 200, description = "All genres", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/genre/create",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid form data"),
        (status = 403, description = "Permission denied")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<JsonBody<CreateGenre>, AppError>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require(Permission::AddGenre)?;
    let JsonBody(genre) = payload?;
    let created = state.services.catalog.create_genre(genre).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a genre
#[utoipa::path(
    post,
    path = "/genre/{id}/delete",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 303, description = "Genre deleted, redirect to /genres"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    claims.require(Permission::DeleteGenre)?;
    state.services.catalog.delete_genre(id).await?;
    Ok(Redirect::to("/genres"))
}
