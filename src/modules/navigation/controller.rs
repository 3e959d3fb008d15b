use axum::Json;
use axum::extract::Query;
use serde::Deserialize;
use utoipa::IntoParams;

use shoky_access::{badge, nav_entries};
use shoky_models::NavigationResponse;

use crate::middleware::auth::CurrentAuth;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NavigationQuery {
    /// Path of the page being shown; its entry is marked active.
    pub active: Option<String>,
}

/// Navigation visible to the caller
///
/// Empty (and without a badge) unless the caller is authenticated with a
/// profile.
#[utoipa::path(
    get,
    path = "/api/navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Role badge and filtered navigation", body = NavigationResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Navigation"
)]
pub async fn get_navigation(
    CurrentAuth(resolved): CurrentAuth,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationResponse> {
    Json(NavigationResponse {
        badge: resolved.profile().map(badge),
        items: nav_entries(&resolved, query.active.as_deref().unwrap_or_default()),
    })
}
