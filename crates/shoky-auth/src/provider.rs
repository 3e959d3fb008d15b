//! Ports to the external identity and profile services.
//!
//! Both are asynchronous and never block the caller. Implementations live
//! outside this crate (PostgreSQL in the server, in-memory fakes in tests).

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;
use uuid::Uuid;

use shoky_config::SessionConfig;
use shoky_models::{LoginRequest, Profile, Role, Session};

/// A session-change notification. `None` means signed out or expired.
pub type SessionChange = Option<Session>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("No active session")]
    NoSession,
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
    #[error("Identity provider error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileStoreError {
    /// Connection or service failure; worth retrying.
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),
    /// The row exists but holds a value outside the closed enumerations.
    #[error("Profile row failed integrity checks: {0}")]
    Integrity(String),
    #[error("No profile for user {0}")]
    NotFound(Uuid),
    #[error("Profile store error: {0}")]
    Internal(String),
}

impl ProfileStoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ProfileStoreError::Unavailable(_))
    }
}

/// Verifies credentials and owns the lifecycle of sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Session-change notifications. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<SessionChange>;

    async fn current_session(&self) -> Result<Option<Session>, IdentityError>;

    /// On success the provider also publishes `Some(session)` to subscribers.
    async fn sign_in(&self, credentials: &LoginRequest) -> Result<Session, IdentityError>;

    /// On success the provider also publishes `None` to subscribers.
    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Read and role-update access to profile rows.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when no row exists for `user_id`.
    async fn fetch_profile_by_id(&self, user_id: Uuid)
    -> Result<Option<Profile>, ProfileStoreError>;

    async fn update_profile_role(&self, user_id: Uuid, role: Role)
    -> Result<(), ProfileStoreError>;
}

/// Fetches a profile, retrying transient failures with exponential backoff.
///
/// Non-transient errors and the last failed attempt are returned as-is; the
/// caller decides how to fail closed.
pub async fn fetch_profile_with_retry(
    store: &dyn ProfileStore,
    user_id: Uuid,
    config: &SessionConfig,
) -> Result<Option<Profile>, ProfileStoreError> {
    let mut retry = 0;
    loop {
        match store.fetch_profile_by_id(user_id).await {
            Err(err) if err.is_transient() && retry + 1 < config.profile_fetch_attempts => {
                let delay = config.backoff_for(retry);
                warn!(
                    %user_id,
                    attempt = retry + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Profile fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            result => return result,
        }
    }
}
