//! Author endpoints

use axum::{
    extract::State,
    http::{header::LOCATION, HeaderName, StatusCode},
    response::Redirect,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetail, CreateAuthor, UpdateAuthor},
        page::{Page, PageQuery},
        permission::Permission,
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody, Path, Query};

/// List authors ordered by last then first name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of authors", body = Page<Author>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Author>>> {
    let authors = state.services.catalog.list_authors(query.page).await?;
    Ok(Json(authors))
}

/// Get author with their books
#[utoipa::path(
    get,
    path = "/author/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.catalog.get_author_detail(id).await?;
    Ok(Json(author))
}

/// Empty author creation form
#[utoipa::path(
    get,
    path = "/author/create",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "No initial values"),
        (status = 302, description = "Login required"),
        (status = 403, description = "Permission denied")
    )
)]
pub async fn create_form(AuthenticatedUser(claims): AuthenticatedUser) -> AppResult<Json<Option<Author>>> {
    claims.require(Permission::AddAuthor)?;
    Ok(Json(None))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/author/create",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid form data"),
        (status = 403, description = "Permission denied")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<JsonBody<CreateAuthor>, AppError>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<Author>)> {
    claims.require(Permission::AddAuthor)?;
    let JsonBody(author) = payload?;
    let created = state.services.catalog.create_author(author).await?;
    let location = format!("/author/{}", created.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(created)))
}

/// Current values for the author update form
#[utoipa::path(
    get,
    path = "/author/{id}/update",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author to update", body = Author),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Author>> {
    claims.require(Permission::ChangeAuthor)?;
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Update an author
#[utoipa::path(
    post,
    path = "/author/{id}/update",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid form data"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    payload: Result<JsonBody<UpdateAuthor>, AppError>,
) -> AppResult<Json<Author>> {
    claims.require(Permission::ChangeAuthor)?;
    let JsonBody(update) = payload?;
    let author = state.services.catalog.update_author(id, update).await?;
    Ok(Json(author))
}

/// Author to confirm before deletion
#[utoipa::path(
    get,
    path = "/author/{id}/delete",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author to delete", body = AuthorDetail),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_confirm(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    claims.require(Permission::DeleteAuthor)?;
    let author = state.services.catalog.get_author_detail(id).await?;
    Ok(Json(author))
}

/// Delete an author; their books lose the author reference
#[utoipa::path(
    post,
    path = "/author/{id}/delete",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 303, description = "Author deleted, redirect to /authors"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    claims.require(Permission::DeleteAuthor)?;
    state.services.catalog.delete_author(id).await?;
    Ok(Redirect::to("/authors"))
}
