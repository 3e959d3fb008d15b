use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};

use shoky_core::AppError;
use shoky_models::{AuthStateResponse, LoginRequest, LoginResponse, MessageResponse};

use super::service::SessionService;
use crate::metrics::{
    track_login_failure, track_login_success, track_session_issued, track_session_revoked,
};
use crate::middleware::auth::{AuthSession, CurrentAuth};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Sign in and open a session
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = shoky_models::ErrorResponse),
        (status = 400, description = "Malformed request body", body = shoky_models::ErrorResponse),
        (status = 422, description = "Validation error", body = shoky_models::ErrorResponse),
        (status = 500, description = "Internal server error", body = shoky_models::ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = match SessionService::sign_in(&state.db, &dto, &state.jwt_config).await {
        Ok(session) => session,
        Err(err) => {
            track_login_failure(if err.status.is_client_error() {
                "invalid_credentials"
            } else {
                "error"
            });
            return Err(err);
        }
    };

    track_login_success();
    track_session_issued();
    info!(user_id = %session.user_id, session_id = %session.id, "Session opened");

    Ok(Json(LoginResponse::from(&session)))
}

/// Revoke the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session revoked", body = MessageResponse),
        (status = 401, description = "No active session", body = shoky_models::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Json<MessageResponse>, AppError> {
    SessionService::sign_out(&state.db, session.id).await?;
    track_session_revoked();
    info!(session_id = %session.id, "Session revoked");

    Ok(Json(MessageResponse {
        message: "Signed out successfully".to_string(),
    }))
}

/// The caller's resolved auth state
#[utoipa::path(
    get,
    path = "/api/auth/state",
    responses(
        (status = 200, description = "Resolved auth state; never contains the token", body = AuthStateResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn auth_state(CurrentAuth(resolved): CurrentAuth) -> Json<AuthStateResponse> {
    Json(resolved.to_response())
}
