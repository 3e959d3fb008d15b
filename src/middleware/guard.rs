//! Authorization gate for page routes.

use axum::{
    Json,
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use shoky_access::{GuardDecision, evaluate, routes};
use shoky_models::{LoadingView, NotFoundView};

use crate::metrics::track_guard_decision;
use crate::middleware::auth::{bearer_token, resolve_request_auth};
use crate::state::AppState;

/// Resolves the caller and applies the guard of the matched page.
///
/// On `Render` the resolved state is stored in the request extensions so
/// the handler does not resolve it again.
pub async fn guard_route(
    State(state): State<AppState>,
    matched: MatchedPath,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(route) = routes::find(matched.as_str()) else {
        return (
            StatusCode::NOT_FOUND,
            Json(NotFoundView {
                path: matched.as_str().to_string(),
                message: "Oops! Page not found".to_string(),
            }),
        )
            .into_response();
    };

    let token = bearer_token(req.headers());
    let resolved = resolve_request_auth(&state, token.as_deref()).await;
    let decision = evaluate(&resolved, &route.guard);
    track_guard_decision(route.path, decision);

    match decision {
        GuardDecision::Render => {
            req.extensions_mut().insert(resolved);
            next.run(req).await
        }
        GuardDecision::Loading => (
            StatusCode::ACCEPTED,
            Json(LoadingView {
                status: resolved.status().as_str().to_string(),
                message: "Loading...".to_string(),
            }),
        )
            .into_response(),
        GuardDecision::RedirectToLogin { reason } => {
            debug!(path = route.path, reason = reason.as_str(), "Redirecting to login");
            Redirect::to(shoky_access::LOGIN_PATH).into_response()
        }
        GuardDecision::RedirectToDefault => {
            debug!(
                path = route.path,
                role = ?resolved.role(),
                "Role not admitted, redirecting to default page"
            );
            Redirect::to(shoky_access::DEFAULT_AUTHENTICATED_PATH).into_response()
        }
    }
}
