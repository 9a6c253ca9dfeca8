//! Login, logout and current-user endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppResult, models::user::UserClaims, AppState};

use super::{AuthenticatedUser, JsonBody, Query};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// Path to return to after logging in
    pub next: Option<String>,
}

/// Login step shown to anonymous callers of guarded routes
#[derive(Serialize, ToSchema)]
pub struct LoginPage {
    pub message: String,
    pub next: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
    pub user: UserInfo,
    /// Where to continue, defaults to `/`
    pub next: String,
}

/// Current user as carried by the access token
#[derive(Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub permissions: Vec<String>,
}

impl From<&UserClaims> for UserInfo {
    fn from(claims: &UserClaims) -> Self {
        Self {
            id: claims.user_id,
            username: claims.sub.clone(),
            is_superuser: claims.is_superuser,
            permissions: claims.permissions.clone(),
        }
    }
}

/// Login step
#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "auth",
    params(LoginQuery),
    responses(
        (status = 200, description = "Credentials required", body = LoginPage)
    )
)]
pub async fn login_page(Query(query): Query<LoginQuery>) -> Json<LoginPage> {
    Json(LoginPage {
        message: "Please login to see this page.".to_string(),
        next: query.next,
    })
}

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token also set as cookie", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (token, claims) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    let cookie = Cookie::build((state.config.auth.token_cookie.clone(), token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.jwt_expiration_hours * 3600,
        user: UserInfo::from(&claims),
        next: request.next.unwrap_or_else(|| "/".to_string()),
    };
    Ok((jar.add(cookie), Json(response)))
}

/// Drop the token cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Logged out")
    )
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let cookie = Cookie::build((state.config.auth.token_cookie.clone(), "")).path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

/// Get current user info
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 302, description = "Login required")
    )
)]
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<UserInfo> {
    Json(UserInfo::from(&claims))
}
