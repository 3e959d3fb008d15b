//! Page views.
//!
//! Protected pages only run after the gate has admitted the caller, so the
//! resolved auth state is already in the request extensions.

use axum::{
    Extension, Json,
    extract::MatchedPath,
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};

use shoky_access::{
    DEFAULT_AUTHENTICATED_PATH, LOGIN_PATH, badge, dashboard_greeting, landing_features,
    nav_entries, routes,
};
use shoky_auth::AuthState;
use shoky_core::AppError;
use shoky_models::{AuthView, LandingView, NotFoundView, PageContent, PageView};

use crate::middleware::auth::CurrentAuth;

/// Public landing page; signed-in members go straight to their dashboard.
pub async fn index(CurrentAuth(resolved): CurrentAuth) -> Response {
    if matches!(resolved, AuthState::Authenticated { .. }) {
        return Redirect::to(DEFAULT_AUTHENTICATED_PATH).into_response();
    }

    Json(LandingView {
        name: "Shoky Community Hub".to_string(),
        tagline: "Modern Community Management".to_string(),
        roles: landing_features(),
        login_path: LOGIN_PATH.to_string(),
    })
    .into_response()
}

/// Login surface. Only an authenticated caller is sent on, so a session
/// without a profile can still reach this page.
pub async fn auth_page(CurrentAuth(resolved): CurrentAuth) -> Response {
    if matches!(resolved, AuthState::Authenticated { .. }) {
        return Redirect::to(DEFAULT_AUTHENTICATED_PATH).into_response();
    }

    Json(AuthView {
        login_endpoint: "/api/auth/login".to_string(),
        message: "Sign in to access your dashboard".to_string(),
    })
    .into_response()
}

pub async fn page(
    Extension(resolved): Extension<AuthState>,
    matched: MatchedPath,
) -> Result<Json<PageView>, AppError> {
    let path = matched.as_str();
    let route = routes::find(path)
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Page not found")))?;
    let profile = resolved
        .profile()
        .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))?;

    let content = if route.path == DEFAULT_AUTHENTICATED_PATH {
        PageContent::Dashboard {
            greeting: dashboard_greeting(profile.role),
        }
    } else {
        PageContent::Placeholder {
            heading: route.title.to_string(),
            message: "Coming soon...".to_string(),
        }
    };

    Ok(Json(PageView {
        path: route.path.to_string(),
        title: route.title.to_string(),
        badge: badge(profile),
        navigation: nav_entries(&resolved, route.path),
        content,
    }))
}

pub async fn not_found(uri: Uri) -> (StatusCode, Json<NotFoundView>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundView {
            path: uri.path().to_string(),
            message: "Oops! Page not found".to_string(),
        }),
    )
}
