use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::{debug, warn};

use shoky_auth::{AuthState, fetch_profile_with_retry};
use shoky_core::AppError;
use shoky_models::{Profile, Session};

use crate::metrics::track_profile_resolution;
use crate::modules::auth::service::SessionService;
use crate::modules::profiles::store::PgProfileStore;
use crate::state::AppState;

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// Runs the auth state machine for one request.
///
/// No token or no live session gives `Unauthenticated`; otherwise the
/// profile lookup (with retries) decides between `Authenticated` and
/// `ProfileMissing`. A session lookup that fails also gives
/// `Unauthenticated`.
pub async fn resolve_request_auth(state: &AppState, token: Option<&str>) -> AuthState {
    let Some(token) = token else {
        return AuthState::Unauthenticated;
    };

    let session =
        match SessionService::find_active_session(&state.db, token, &state.jwt_config).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!("No active session for bearer token");
                return AuthState::Unauthenticated;
            }
            Err(err) => {
                warn!(error = %err.error, "Session lookup failed");
                return AuthState::Unauthenticated;
            }
        };

    let store = PgProfileStore::new(state.db.clone());
    let lookup = fetch_profile_with_retry(&store, session.user_id, &state.session_config).await;
    let resolved = AuthState::resolve(session, lookup);

    track_profile_resolution(&resolved);
    resolved
}

/// The caller's resolved auth state. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentAuth(pub AuthState);

impl FromRequestParts<AppState> for CurrentAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(resolved) = parts.extensions.get::<AuthState>() {
            return Ok(CurrentAuth(resolved.clone()));
        }

        let token = bearer_token(&parts.headers);
        let resolved = resolve_request_auth(state, token.as_deref()).await;
        parts.extensions.insert(resolved.clone());
        Ok(CurrentAuth(resolved))
    }
}

/// A live session, without resolving the profile. 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Missing bearer token".to_string()))?;

        SessionService::find_active_session(&state.db, &token, &state.jwt_config)
            .await?
            .map(AuthSession)
            .ok_or_else(|| AppError::unauthorized("Invalid or expired session".to_string()))
    }
}

/// An authenticated member with their profile.
///
/// 401 without a session, 403 when the session has no usable profile.
#[derive(Debug, Clone)]
pub struct RequireProfile {
    pub session: Session,
    pub profile: Profile,
}

impl FromRequestParts<AppState> for RequireProfile {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentAuth(resolved) = CurrentAuth::from_request_parts(parts, state).await?;

        match resolved {
            AuthState::Authenticated { session, profile } => Ok(RequireProfile { session, profile }),
            AuthState::ProfileMissing { .. } => Err(AppError::forbidden(
                "No profile is associated with this account".to_string(),
            )),
            _ => Err(AppError::unauthorized("Authentication required".to_string())),
        }
    }
}
