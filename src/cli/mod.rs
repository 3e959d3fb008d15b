//! Administrative operations behind `shoky-cli`.

pub mod seeder;

use std::sync::Arc;

use sqlx::PgPool;
use validator::Validate;

use shoky_auth::{AuthContext, AuthState, IdentityError};
use shoky_config::{JwtConfig, SessionConfig};
use shoky_core::AppError;
use shoky_models::{CreateMemberDto, LoginRequest, Profile, Role};

use crate::metrics::track_member_created;
use crate::modules::auth::provider::PgIdentityProvider;
use crate::modules::profiles::service::ProfileService;
use crate::modules::profiles::store::PgProfileStore;

/// Creates credentials and a profile. Members are only provisioned here;
/// the HTTP API has no sign-up route.
pub async fn create_member(db: &PgPool, dto: CreateMemberDto) -> Result<Profile, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let role = dto.role;
    let profile = ProfileService::create_member(db, dto).await?;
    track_member_created(role);
    Ok(profile)
}

pub async fn set_role(db: &PgPool, email: &str, role: Role) -> Result<Profile, AppError> {
    ProfileService::set_role_by_email(db, email, role).await
}

/// Builds an [`AuthContext`] over the database-backed identity provider and
/// profile store, the same way a signed-in client observes its session.
pub async fn open_dashboard(
    db: &PgPool,
    jwt_config: JwtConfig,
    session_config: SessionConfig,
) -> Arc<AuthContext> {
    let identity = Arc::new(PgIdentityProvider::new(db.clone(), jwt_config));
    let profiles = Arc::new(PgProfileStore::new(db.clone()));
    let ctx = AuthContext::new(identity, profiles, session_config);
    ctx.initialize().await;
    ctx
}

/// Signs in and waits until the new session's profile is resolved.
pub async fn sign_in_and_settle(
    ctx: &AuthContext,
    credentials: &LoginRequest,
) -> Result<AuthState, IdentityError> {
    let mut states = ctx.subscribe();
    let session = ctx.sign_in(credentials).await?;

    let settled = states
        .wait_for(|state| {
            state.is_settled() && state.session().is_some_and(|held| held.id == session.id)
        })
        .await
        .map(|state| state.clone());

    Ok(settled.unwrap_or_else(|_| ctx.snapshot()))
}
