//! Borrowed-book lists and the renewal workflow

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::LoanedCopy,
        page::{Page, PageQuery},
        permission::Permission,
        renewal::{RenewBookForm, RenewalPage},
    },
    services::loans::RenewalOutcome,
    AppState,
};

use super::{AuthenticatedUser, FormBody, Path, Query};

/// Copies on loan to the current user
#[utoipa::path(
    get,
    path = "/mybooks",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of borrowed copies", body = Page<LoanedCopy>),
        (status = 302, description = "Login required"),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn my_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<LoanedCopy>>> {
    let loans = state.services.loans.my_loans(claims.user_id, query.page).await?;
    Ok(Json(loans))
}

/// Every copy on loan, with its borrower
#[utoipa::path(
    get,
    path = "/allborrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of borrowed copies", body = Page<LoanedCopy>),
        (status = 302, description = "Login required"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn all_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<LoanedCopy>>> {
    claims.require(Permission::CanMarkReturned)?;
    let loans = state.services.loans.all_loans(query.page).await?;
    Ok(Json(loans))
}

/// Renewal form pre-filled three weeks ahead
#[utoipa::path(
    get,
    path = "/book/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Renewal form", body = RenewalPage),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renewal_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalPage>> {
    claims.require(Permission::CanMarkReturned)?;
    let page = state.services.loans.renewal_page(id).await?;
    Ok(Json(page))
}

/// Submit a new due date for a copy
#[utoipa::path(
    post,
    path = "/book/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body(content = RenewBookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Renewed, redirect to /allborrowed"),
        (status = 400, description = "Invalid renewal date", body = RenewalPage),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renew_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    form: Result<FormBody<RenewBookForm>, AppError>,
) -> AppResult<Response> {
    claims.require(Permission::CanMarkReturned)?;
    let FormBody(form) = form?;

    let response = match state.services.loans.renew(id, form).await? {
        RenewalOutcome::Renewed(_) => Redirect::to("/allborrowed").into_response(),
        RenewalOutcome::Invalid(page) => (StatusCode::BAD_REQUEST, Json(page)).into_response(),
    };
    Ok(response)
}
