use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};

use shoky_core::AppError;
use shoky_models::{Profile, Role, UpgradeRoleResponse};

use super::service::ProfileService;
use crate::metrics::track_role_upgrade;
use crate::middleware::auth::RequireProfile;
use crate::state::AppState;

/// Get the signed-in member's profile
#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Current profile", body = Profile),
        (status = 401, description = "No active session", body = shoky_models::ErrorResponse),
        (status = 403, description = "Session has no profile", body = shoky_models::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
pub async fn get_my_profile(RequireProfile { profile, .. }: RequireProfile) -> Json<Profile> {
    Json(profile)
}

/// Upgrade the signed-in member to super admin
///
/// Idempotent: a member who already holds the role gets `upgraded: false`.
#[utoipa::path(
    post,
    path = "/api/profiles/me/upgrade",
    responses(
        (status = 200, description = "Profile after the upgrade", body = UpgradeRoleResponse),
        (status = 401, description = "No active session", body = shoky_models::ErrorResponse),
        (status = 403, description = "Session has no profile", body = shoky_models::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip_all)]
pub async fn upgrade_my_profile(
    State(state): State<AppState>,
    RequireProfile { profile, .. }: RequireProfile,
) -> Result<Json<UpgradeRoleResponse>, AppError> {
    if profile.role == Role::SuperAdmin {
        return Ok(Json(UpgradeRoleResponse {
            profile,
            upgraded: false,
        }));
    }

    let previous = profile.role;
    let profile = ProfileService::update_role(&state.db, profile.id, Role::SuperAdmin).await?;
    track_role_upgrade();
    info!(user_id = %profile.id, from = %previous, "Profile upgraded to super_admin");

    Ok(Json(UpgradeRoleResponse {
        profile,
        upgraded: true,
    }))
}
