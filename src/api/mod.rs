//! API handlers for the catalog HTTP endpoints

pub mod auth;
pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod health;
pub mod home;
pub mod languages;
pub mod loans;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// JSON request body whose rejections are reported as `AppError` bodies
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Form request body whose rejections are reported as `AppError` bodies
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct FormBody<T>(pub T);

/// Path parameters; a segment that does not parse is a 404
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Query string; a malformed value is a 404
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

/// Extractor for the authenticated user, from a Bearer token or the token cookie.
///
/// Anonymous callers are rejected with `LoginRequired`, which redirects them to
/// the login step with the requested path as `next`.
pub struct AuthenticatedUser(pub UserClaims);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let login_required = || AppError::LoginRequired {
            login_url: state.config.auth.login_url.clone(),
            next: parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| parts.uri.path().to_string()),
        };

        let token = bearer_token(&parts.headers).or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(&state.config.auth.token_cookie)
                .map(|cookie| cookie.value().to_string())
        });
        let Some(token) = token else {
            return Err(login_required());
        };

        match UserClaims::from_token(&token, &state.config.auth.jwt_secret) {
            Ok(claims) => Ok(AuthenticatedUser(claims)),
            Err(e) => {
                tracing::debug!("rejected access token: {}", e);
                Err(login_required())
            }
        }
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route("/", get(home::index))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users", post(users::create_user))
        // Books
        .route("/books", get(books::list_books))
        .route("/book/create", get(books::create_form).post(books::create_book))
        .route("/book/:id", get(books::get_book))
        .route("/book/:id/update", get(books::update_form).post(books::update_book))
        .route("/book/:id/delete", get(books::delete_confirm).post(books::delete_book))
        .route("/book/:id/renew", get(loans::renewal_form).post(loans::renew_book))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route("/author/create", get(authors::create_form).post(authors::create_author))
        .route("/author/:id", get(authors::get_author))
        .route("/author/:id/update", get(authors::update_form).post(authors::update_author))
        .route("/author/:id/delete", get(authors::delete_confirm).post(authors::delete_author))
        // Loans
        .route("/mybooks", get(loans::my_books))
        .route("/allborrowed", get(loans::all_borrowed))
        // Copies
        .route("/bookinstance/create", post(book_instances::create_copy))
        .route("/bookinstance/:id/update", post(book_instances::update_copy))
        .route("/bookinstance/:id/delete", post(book_instances::delete_copy))
        // Genres & languages
        .route("/genres", get(genres::list_genres))
        .route("/genre/create", post(genres::create_genre))
        .route("/genre/:id/delete", post(genres::delete_genre))
        .route("/languages", get(languages::list_languages))
        .route("/language/create", post(languages::create_language))
        .route("/language/:id/delete", post(languages::delete_language))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));
    }
}
