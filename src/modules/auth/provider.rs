//! PostgreSQL-backed [`IdentityProvider`] for in-process clients.
//!
//! Holds at most one session, like a signed-in client would, and publishes
//! every change (sign-in, sign-out, expiry) on a broadcast channel. The
//! server itself is stateless and resolves sessions per request instead.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use shoky_auth::{IdentityError, IdentityProvider, SessionChange};
use shoky_config::JwtConfig;
use shoky_core::AppError;
use shoky_models::{LoginRequest, Session};

use super::service::SessionService;

const CHANNEL_CAPACITY: usize = 16;

pub struct PgIdentityProvider {
    db: PgPool,
    jwt_config: JwtConfig,
    current: Arc<Mutex<Option<Session>>>,
    changes: broadcast::Sender<SessionChange>,
    expiry: Mutex<Option<JoinHandle<()>>>,
}

impl PgIdentityProvider {
    pub fn new(db: PgPool, jwt_config: JwtConfig) -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            db,
            jwt_config,
            current: Arc::new(Mutex::new(None)),
            changes,
            expiry: Mutex::new(None),
        }
    }

    fn held_session(&self) -> Option<Session> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    fn store(&self, session: Option<Session>) {
        if let Ok(mut current) = self.current.lock() {
            *current = session;
        }
    }

    fn publish(&self, change: SessionChange) {
        // No receivers is fine: nobody is observing yet.
        let _ = self.changes.send(change);
    }

    /// Publishes `None` when the session reaches its expiry, unless it was
    /// replaced or signed out first.
    fn schedule_expiry(&self, session: &Session) {
        let delay = (session.expires_at - Utc::now()).to_std().unwrap_or_default();
        let session_id = session.id;
        let current = Arc::clone(&self.current);
        let changes = self.changes.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let expired = match current.lock() {
                Ok(mut held) if held.as_ref().is_some_and(|s| s.id == session_id) => {
                    *held = None;
                    true
                }
                _ => false,
            };
            if expired {
                info!(%session_id, "Session expired");
                let _ = changes.send(None);
            }
        });

        self.replace_expiry(Some(handle));
    }

    fn replace_expiry(&self, handle: Option<JoinHandle<()>>) {
        if let Ok(mut expiry) = self.expiry.lock() {
            if let Some(previous) = std::mem::replace(&mut *expiry, handle) {
                previous.abort();
            }
        }
    }
}

impl Drop for PgIdentityProvider {
    fn drop(&mut self) {
        self.replace_expiry(None);
    }
}

fn identity_error(err: AppError) -> IdentityError {
    match err.status {
        StatusCode::UNAUTHORIZED => IdentityError::InvalidCredentials,
        status if status.is_server_error() => IdentityError::Unavailable(err.error.to_string()),
        _ => IdentityError::Internal(err.error.to_string()),
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }

    /// Re-validates the held session so a revocation made elsewhere is seen.
    async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
        let Some(held) = self.held_session() else {
            return Ok(None);
        };

        let live =
            SessionService::find_active_session(&self.db, &held.access_token, &self.jwt_config)
                .await
                .map_err(identity_error)?;

        if live.is_none() {
            warn!(session_id = %held.id, "Held session is no longer active");
            self.store(None);
            self.replace_expiry(None);
        }
        Ok(live)
    }

    #[instrument(skip_all, fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: &LoginRequest) -> Result<Session, IdentityError> {
        let session = SessionService::sign_in(&self.db, credentials, &self.jwt_config)
            .await
            .map_err(identity_error)?;

        self.store(Some(session.clone()));
        self.schedule_expiry(&session);
        self.publish(Some(session.clone()));
        Ok(session)
    }

    #[instrument(skip_all)]
    async fn sign_out(&self) -> Result<(), IdentityError> {
        let session = self.held_session().ok_or(IdentityError::NoSession)?;

        SessionService::sign_out(&self.db, session.id)
            .await
            .map_err(identity_error)?;

        self.store(None);
        self.replace_expiry(None);
        self.publish(None);
        Ok(())
    }
}
