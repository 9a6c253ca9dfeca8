//! Language endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::Redirect,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        language::{CreateLanguage, Language},
        permission::Permission,
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody, Path};

/// List languages by name
#[utoipa::path(
    get,
    path = "/languages",
    tag = "languages",
    responses(
        (status = 200, description = "All languages", body = Vec<Language>)
    )
)]
pub async fn list_languages(State(state): State<AppState>) -> AppResult<Json<Vec<Language>>> {
    let languages = state.services.catalog.list_languages().await?;
    Ok(Json(languages))
}

/// Create a language
#[utoipa::path(
    post,
    path = "/language/create",
    tag = "languages",
    security(("bearer_auth" = [])),
    request_body = CreateLanguage,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Invalid form data"),
        (status = 403, description = "Permission denied")
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<JsonBody<CreateLanguage>, AppError>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require(Permission::AddLanguage)?;
    let JsonBody(language) = payload?;
    let created = state.services.catalog.create_language(language).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a language; its books lose the language reference
#[utoipa::path(
    post,
    path = "/language/{id}/delete",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 303, description = "Language deleted, redirect to /languages"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn delete_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    claims.require(Permission::DeleteLanguage)?;
    state.services.catalog.delete_language(id).await?;
    Ok(Redirect::to("/languages"))
}
