//! Book catalog endpoints

use axum::{
    extract::State,
    http::{header::LOCATION, HeaderName, StatusCode},
    response::Redirect,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookDetail, BookForm, BookSummary, CreateBook, UpdateBook},
        page::{Page, PageQuery},
        permission::Permission,
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody, Path, Query};

/// List books ordered by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of books", body = Page<BookSummary>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BookSummary>>> {
    let books = state.services.catalog.list_books(query.page).await?;
    Ok(Json(books))
}

/// Get book details with copies
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Choices for the book creation form
#[utoipa::path(
    get,
    path = "/book/create",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Form context", body = BookForm),
        (status = 302, description = "Login required"),
        (status = 403, description = "Permission denied")
    )
)]
pub async fn create_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<BookForm>> {
    claims.require(Permission::AddBook)?;
    let form = state.services.catalog.book_form(None).await?;
    Ok(Json(form))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/book/create",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookDetail),
        (status = 400, description = "Invalid form data"),
        (status = 403, description = "Permission denied")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<JsonBody<CreateBook>, AppError>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<BookDetail>)> {
    claims.require(Permission::AddBook)?;
    let JsonBody(book) = payload?;
    let created = state.services.catalog.create_book(book).await?;
    let location = format!("/book/{}", created.book.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(created)))
}

/// Current values and choices for the book update form
#[utoipa::path(
    get,
    path = "/book/{id}/update",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Form context", body = BookForm),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookForm>> {
    claims.require(Permission::ChangeBook)?;
    let form = state.services.catalog.book_form(Some(id)).await?;
    Ok(Json(form))
}

/// Update a book
#[utoipa::path(
    post,
    path = "/book/{id}/update",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDetail),
        (status = 400, description = "Invalid form data"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    payload: Result<JsonBody<UpdateBook>, AppError>,
) -> AppResult<Json<BookDetail>> {
    claims.require(Permission::ChangeBook)?;
    let JsonBody(update) = payload?;
    let book = state.services.catalog.update_book(id, update).await?;
    Ok(Json(book))
}

/// Book to confirm before deletion
#[utoipa::path(
    get,
    path = "/book/{id}/delete",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book to delete", body = BookDetail),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_confirm(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetail>> {
    claims.require(Permission::DeleteBook)?;
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Delete a book without copies
#[utoipa::path(
    post,
    path = "/book/{id}/delete",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Book deleted, redirect to /books"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book still has copies")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    claims.require(Permission::DeleteBook)?;
    state.services.catalog.delete_book(id).await?;
    Ok(Redirect::to("/books"))
}
