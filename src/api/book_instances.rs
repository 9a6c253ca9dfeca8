//! Book copy endpoints

use axum::{
    extract::State,
    http::{header::LOCATION, HeaderName, StatusCode},
    response::Redirect,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{BookInstance, CreateBookInstance, UpdateBookInstance},
        permission::Permission,
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody, Path};

/// Add a copy of a book
#[utoipa::path(
    post,
    path = "/bookinstance/create",
    tag = "book_instances",
    security(("bearer_auth" = [])),
    request_body = CreateBookInstance,
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 400, description = "Invalid form data"),
        (status = 403, description = "Permission denied")
    )
)]
pub async fn create_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<JsonBody<CreateBookInstance>, AppError>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<BookInstance>)> {
    claims.require(Permission::AddBookInstance)?;
    let JsonBody(copy) = payload?;
    let created = state.services.loans.create_copy(copy).await?;
    let location = match created.book_id {
        Some(book_id) => format!("/book/{}", book_id),
        None => "/books".to_string(),
    };
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(created)))
}

/// Update a copy
#[utoipa::path(
    post,
    path = "/bookinstance/{id}/update",
    tag = "book_instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body = UpdateBookInstance,
    responses(
        (status = 200, description = "Copy updated", body = BookInstance),
        (status = 400, description = "Invalid form data"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn update_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    payload: Result<JsonBody<UpdateBookInstance>, AppError>,
) -> AppResult<Json<BookInstance>> {
    claims.require(Permission::ChangeBookInstance)?;
    let JsonBody(update) = payload?;
    let copy = state.services.loans.update_copy(id, update).await?;
    Ok(Json(copy))
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/bookinstance/{id}/delete",
    tag = "book_instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 303, description = "Copy deleted, redirect to its book"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn delete_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    claims.require(Permission::DeleteBookInstance)?;
    let redirect = match state.services.loans.delete_copy(id).await? {
        Some(book_id) => Redirect::to(&format!("/book/{}", book_id)),
        None => Redirect::to("/books"),
    };
    Ok(redirect)
}
