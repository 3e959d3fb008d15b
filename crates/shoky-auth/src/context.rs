//! The auth context: single writer of [`AuthState`].
//!
//! Session changes from the [`IdentityProvider`] arrive on a broadcast
//! channel; every consumer (route gate, navigation, CLI dashboard) observes
//! the resulting state through a `watch` receiver.
//!
//! Each session change bumps a generation counter. A profile fetch remembers
//! the generation it was started for and its result is dropped if the
//! session has moved on in the meantime, so a slow fetch for a signed-out
//! user can never resurrect their profile.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use shoky_config::SessionConfig;
use shoky_models::{LoginRequest, Role, Session};

use crate::provider::{
    IdentityError, IdentityProvider, ProfileStore, ProfileStoreError, SessionChange,
    fetch_profile_with_retry,
};
use crate::state::AuthState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("No authenticated profile to upgrade")]
    NotAuthenticated,
    #[error(transparent)]
    Store(#[from] ProfileStoreError),
}

pub struct AuthContext {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    config: SessionConfig,
    state: watch::Sender<AuthState>,
    generation: AtomicU64,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AuthContext {
    /// Creates a context in [`AuthState::Initializing`]. Nothing happens
    /// until [`AuthContext::initialize`] is called.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        config: SessionConfig,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(AuthState::Initializing);
        Arc::new(Self {
            identity,
            profiles,
            config,
            state,
            generation: AtomicU64::new(0),
            listener: Mutex::new(None),
        })
    }

    /// Subscribes to session changes, then performs the initial session
    /// check.
    ///
    /// Subscribing first means a sign-in racing with the check is queued
    /// rather than lost. A failing check counts as "no session".
    pub async fn initialize(self: &Arc<Self>) {
        let receiver = self.identity.subscribe();

        let initial = match self.identity.current_session().await {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "Initial session check failed, treating as signed out");
                None
            }
        };
        self.apply_session(initial);

        let handle = tokio::spawn(listen(Arc::downgrade(self), receiver));
        if let Ok(mut listener) = self.listener.lock() {
            if let Some(previous) = listener.replace(handle) {
                previous.abort();
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Waits until the state leaves `Initializing`/`ResolvingProfile`.
    pub async fn wait_until_settled(&self) -> AuthState {
        let mut receiver = self.state.subscribe();
        match receiver.wait_for(AuthState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// Delegates to the provider. The state follows through the provider's
    /// session notification, never directly from this call.
    pub async fn sign_in(&self, credentials: &LoginRequest) -> Result<Session, IdentityError> {
        self.identity.sign_in(credentials).await
    }

    /// Signs out through the provider. On failure the current state is kept
    /// and the error is returned to the caller.
    pub async fn sign_out(self: &Arc<Self>) -> Result<(), IdentityError> {
        if let Err(err) = self.identity.sign_out().await {
            warn!(error = %err, "Sign-out failed, keeping current session");
            return Err(err);
        }
        self.apply_session(None);
        Ok(())
    }

    /// Grants `super_admin` to the signed-in member and refreshes the
    /// profile. Returns `false` when the role was already held.
    ///
    /// The refresh is skipped if the session changed while the store was
    /// updating; the state then belongs to whatever replaced it.
    pub async fn upgrade_to_super_admin(self: &Arc<Self>) -> Result<bool, UpgradeError> {
        let (session, role, generation) = match &*self.state.borrow() {
            AuthState::Authenticated { session, profile } => (
                session.clone(),
                profile.role,
                self.generation.load(Ordering::SeqCst),
            ),
            _ => return Err(UpgradeError::NotAuthenticated),
        };

        if role == Role::SuperAdmin {
            return Ok(false);
        }

        self.profiles
            .update_profile_role(session.user_id, Role::SuperAdmin)
            .await?;
        info!(user_id = %session.user_id, from = %role, "Profile upgraded to super_admin");

        let user_id = session.user_id;
        match self.refresh_if_current(session, generation) {
            Some((session, next)) => self.spawn_profile_fetch(session, next),
            None => {
                debug!(%user_id, generation, "Session changed during upgrade, skipping refresh");
            }
        }
        Ok(true)
    }

    /// Stops listening for session changes. The last state stays readable.
    pub fn shutdown(&self) {
        if let Ok(mut listener) = self.listener.lock() {
            if let Some(handle) = listener.take() {
                handle.abort();
            }
        }
    }

    /// Applies a session change. A repeated notification for the session
    /// already held is ignored.
    fn apply_session(self: &Arc<Self>, change: SessionChange) {
        match change {
            None => {
                self.transition(AuthState::Unauthenticated);
            }
            Some(session) if session.is_expired() => {
                debug!(session_id = %session.id, "Ignoring expired session");
                self.transition(AuthState::Unauthenticated);
            }
            Some(session) => {
                let already_held = self
                    .state
                    .borrow()
                    .session()
                    .is_some_and(|current| current.id == session.id);
                if already_held {
                    debug!(session_id = %session.id, "Session unchanged");
                    return;
                }
                self.resolve_session(session);
            }
        }
    }

    /// Moves to `ResolvingProfile` and starts a fetch for the new generation.
    fn resolve_session(self: &Arc<Self>, session: Session) {
        let generation = self.transition(AuthState::ResolvingProfile {
            session: session.clone(),
        });
        self.spawn_profile_fetch(session, generation);
    }

    /// Replaces the state and starts a new generation. Observers are only
    /// notified when the state actually changed.
    fn transition(&self, next: AuthState) -> u64 {
        let mut generation = 0;
        self.state.send_if_modified(|current| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            if *current == next {
                return false;
            }
            debug!(from = ?current.status(), to = ?next.status(), generation, "Auth state transition");
            *current = next;
            true
        });
        generation
    }

    /// Moves back to `ResolvingProfile` for `session`, but only while
    /// `generation` is still the latest one.
    fn refresh_if_current(&self, session: Session, generation: u64) -> Option<(Session, u64)> {
        let mut next = None;
        self.state.send_if_modified(|current| {
            let latest = self.generation.load(Ordering::SeqCst);
            if latest != generation {
                return false;
            }
            let bumped = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = AuthState::ResolvingProfile {
                session: session.clone(),
            };
            next = Some((session.clone(), bumped));
            true
        });
        next
    }

    fn spawn_profile_fetch(self: &Arc<Self>, session: Session, generation: u64) {
        let context = Arc::downgrade(self);
        let profiles = Arc::clone(&self.profiles);
        let config = self.config.clone();

        tokio::spawn(async move {
            let lookup = fetch_profile_with_retry(profiles.as_ref(), session.user_id, &config).await;
            let Some(context) = context.upgrade() else {
                return;
            };
            context.complete_profile_fetch(generation, AuthState::resolve(session, lookup));
        });
    }

    /// Applies a fetch result only if no newer session change happened.
    fn complete_profile_fetch(&self, generation: u64, resolved: AuthState) {
        self.state.send_if_modified(|current| {
            let latest = self.generation.load(Ordering::SeqCst);
            if latest != generation {
                debug!(generation, latest, "Discarding stale profile result");
                return false;
            }
            if *current == resolved {
                return false;
            }
            info!(status = ?resolved.status(), "Session resolved");
            *current = resolved;
            true
        });
    }
}

impl Drop for AuthContext {
    fn drop(&mut self) {
        if let Ok(listener) = self.listener.get_mut() {
            if let Some(handle) = listener.take() {
                handle.abort();
            }
        }
    }
}

async fn listen(
    context: Weak<AuthContext>,
    mut receiver: tokio::sync::broadcast::Receiver<SessionChange>,
) {
    loop {
        let change = match receiver.recv().await {
            Ok(change) => change,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Missed session notifications, re-checking session");
                let Some(context) = context.upgrade() else {
                    break;
                };
                context.identity.current_session().await.unwrap_or(None)
            }
            Err(RecvError::Closed) => {
                debug!("Identity provider closed its session channel");
                break;
            }
        };

        let Some(context) = context.upgrade() else {
            break;
        };
        context.apply_session(change);
    }
}
