//! Home page: catalog counters and the per-session visit count

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppResult, services::catalog::CatalogCounts, AppState};

#[derive(Serialize, ToSchema)]
pub struct HomeResponse {
    #[serde(flatten)]
    pub counts: CatalogCounts,
    /// Earlier visits to this page in the current session
    pub num_visits: i64,
}

/// Catalog summary
#[utoipa::path(
    get,
    path = "/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog counters", body = HomeResponse)
    )
)]
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<HomeResponse>)> {
    let session = &state.config.session;
    let counts = state.services.catalog.counts().await?;

    let session_id = jar
        .get(&session.cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string();
    let num_visits = state
        .services
        .redis
        .record_visit(&session_id, session.ttl_seconds)
        .await?;

    let cookie = Cookie::build((session.cookie_name.clone(), session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Json(HomeResponse { counts, num_visits })))
}
