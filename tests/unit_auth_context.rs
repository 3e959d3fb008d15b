//! `AuthContext` driven by in-memory identity and profile services.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Semaphore, broadcast};
use uuid::Uuid;

use shoky_auth::{
    AuthContext, AuthState, IdentityError, IdentityProvider, MissingReason, ProfileStore,
    ProfileStoreError, SessionChange, UpgradeError,
};
use shoky_config::SessionConfig;
use shoky_models::{LoginRequest, Profile, Role, Session, UserStatus};

const PASSWORD: &str = "correct-horse";

struct FakeIdentity {
    accounts: HashMap<String, Uuid>,
    current: Mutex<Option<Session>>,
    changes: broadcast::Sender<SessionChange>,
    fail_current: AtomicBool,
    fail_sign_out: AtomicBool,
}

impl FakeIdentity {
    fn new(accounts: &[(&str, Uuid)]) -> Arc<Self> {
        let (changes, _) = broadcast::channel(16);
        Arc::new(Self {
            accounts: accounts
                .iter()
                .map(|(email, id)| (email.to_string(), *id))
                .collect(),
            current: Mutex::new(None),
            changes,
            fail_current: AtomicBool::new(false),
            fail_sign_out: AtomicBool::new(false),
        })
    }

    fn with_session(self: Arc<Self>, session: Session) -> Arc<Self> {
        *self.current.lock().unwrap() = Some(session);
        self
    }

    fn publish(&self, change: SessionChange) {
        *self.current.lock().unwrap() = change.clone();
        let _ = self.changes.send(change);
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }

    async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
        if self.fail_current.load(Ordering::SeqCst) {
            return Err(IdentityError::Unavailable("offline".to_string()));
        }
        Ok(self.current.lock().unwrap().clone())
    }

    async fn sign_in(&self, credentials: &LoginRequest) -> Result<Session, IdentityError> {
        let user_id = match self.accounts.get(&credentials.email) {
            Some(id) if credentials.password == PASSWORD => *id,
            _ => return Err(IdentityError::InvalidCredentials),
        };
        let session = session_for(user_id, &credentials.email);
        self.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(IdentityError::Unavailable("offline".to_string()));
        }
        if self.current.lock().unwrap().is_none() {
            return Err(IdentityError::NoSession);
        }
        self.publish(None);
        Ok(())
    }
}

struct FakeProfiles {
    rows: Mutex<HashMap<Uuid, Profile>>,
    transient_failures: AtomicU32,
    fetches: AtomicU32,
    held: Mutex<HashSet<Uuid>>,
    gate: Arc<Semaphore>,
    hold_updates: AtomicBool,
    updates_started: AtomicU32,
    update_gate: Arc<Semaphore>,
}

impl FakeProfiles {
    fn new(profiles: Vec<Profile>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(profiles.into_iter().map(|p| (p.id, p)).collect()),
            transient_failures: AtomicU32::new(0),
            fetches: AtomicU32::new(0),
            held: Mutex::new(HashSet::new()),
            gate: Arc::new(Semaphore::new(0)),
            hold_updates: AtomicBool::new(false),
            updates_started: AtomicU32::new(0),
            update_gate: Arc::new(Semaphore::new(0)),
        })
    }

    /// Fetches for `user_id` wait until [`FakeProfiles::release`].
    fn hold(&self, user_id: Uuid) {
        self.held.lock().unwrap().insert(user_id);
    }

    fn release(&self) {
        self.gate.add_permits(1);
    }

    fn release_update(&self) {
        self.update_gate.add_permits(1);
    }
}

#[async_trait]
impl ProfileStore for FakeProfiles {
    async fn fetch_profile_by_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Profile>, ProfileStoreError> {
        let held = self.held.lock().unwrap().remove(&user_id);
        if held {
            let gate = Arc::clone(&self.gate);
            gate.acquire().await.unwrap().forget();
        }
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ProfileStoreError::Unavailable("connection reset".to_string()));
        }
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn update_profile_role(&self, user_id: Uuid, role: Role) -> Result<(), ProfileStoreError> {
        self.updates_started.fetch_add(1, Ordering::SeqCst);
        if self.hold_updates.load(Ordering::SeqCst) {
            let gate = Arc::clone(&self.update_gate);
            gate.acquire().await.unwrap().forget();
        }
        match self.rows.lock().unwrap().get_mut(&user_id) {
            Some(profile) => {
                profile.role = role;
                Ok(())
            }
            None => Err(ProfileStoreError::NotFound(user_id)),
        }
    }
}

fn session_for(user_id: Uuid, email: &str) -> Session {
    Session {
        id: Uuid::new_v4(),
        user_id,
        email: email.to_string(),
        access_token: format!("token-{}", Uuid::new_v4()),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

fn profile(id: Uuid, email: &str, role: Role) -> Profile {
    Profile {
        id,
        full_name: "Ada Member".to_string(),
        email: email.to_string(),
        role,
        status: UserStatus::Active,
        department: None,
        phone: None,
        avatar_url: None,
        hire_date: None,
        last_login_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn fast_config() -> SessionConfig {
    SessionConfig::new(3, Duration::from_millis(1))
}

fn credentials(email: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
    }
}

async fn wait_until(ctx: &AuthContext, predicate: impl FnMut(&AuthState) -> bool) -> AuthState {
    let mut states = ctx.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(2), states.wait_for(predicate))
        .await
        .expect("timed out waiting for auth state")
        .expect("auth state channel closed")
        .clone();
    state
}

async fn signed_in(ctx: &AuthContext, email: &str) -> AuthState {
    let session = ctx.sign_in(&credentials(email)).await.unwrap();
    wait_until(ctx, |state| {
        state.is_settled() && state.session().is_some_and(|held| held.id == session.id)
    })
    .await
}

#[tokio::test]
async fn test_starts_initializing_then_unauthenticated() {
    let identity = FakeIdentity::new(&[]);
    let ctx = AuthContext::new(identity, FakeProfiles::new(vec![]), fast_config());

    assert_eq!(ctx.snapshot(), AuthState::Initializing);
    assert!(ctx.snapshot().role().is_none());

    ctx.initialize().await;
    assert_eq!(ctx.wait_until_settled().await, AuthState::Unauthenticated);
}

#[tokio::test]
async fn test_existing_session_resolves_profile() {
    let user_id = Uuid::new_v4();
    let session = session_for(user_id, "dev@shoky.test");
    let identity = FakeIdentity::new(&[]).with_session(session.clone());
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);

    let ctx = AuthContext::new(identity, profiles, fast_config());
    ctx.initialize().await;

    let state = ctx.wait_until_settled().await;
    assert_eq!(state.role(), Some(Role::Developer));
    assert_eq!(state.session(), Some(&session));
}

#[tokio::test]
async fn test_failed_initial_check_counts_as_signed_out() {
    let identity = FakeIdentity::new(&[]).with_session(session_for(Uuid::new_v4(), "x@shoky.test"));
    identity.fail_current.store(true, Ordering::SeqCst);

    let ctx = AuthContext::new(identity, FakeProfiles::new(vec![]), fast_config());
    ctx.initialize().await;

    assert_eq!(ctx.wait_until_settled().await, AuthState::Unauthenticated);
}

#[tokio::test]
async fn test_expired_session_is_unauthenticated() {
    let user_id = Uuid::new_v4();
    let mut session = session_for(user_id, "old@shoky.test");
    session.expires_at = Utc::now() - chrono::Duration::minutes(1);
    let identity = FakeIdentity::new(&[]).with_session(session);
    let profiles = FakeProfiles::new(vec![profile(user_id, "old@shoky.test", Role::HrAdmin)]);

    let ctx = AuthContext::new(identity, profiles.clone(), fast_config());
    ctx.initialize().await;

    assert_eq!(ctx.wait_until_settled().await, AuthState::Unauthenticated);
    assert_eq!(profiles.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_sign_in_goes_through_notification() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("hr@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "hr@shoky.test", Role::HrAdmin)]);

    let ctx = AuthContext::new(identity, profiles, fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;

    let state = signed_in(&ctx, "hr@shoky.test").await;
    assert!(matches!(state, AuthState::Authenticated { .. }));
    assert_eq!(state.profile().map(|p| p.email.as_str()), Some("hr@shoky.test"));
}

#[tokio::test]
async fn test_invalid_credentials_leave_state_untouched() {
    let identity = FakeIdentity::new(&[("dev@shoky.test", Uuid::new_v4())]);
    let ctx = AuthContext::new(identity, FakeProfiles::new(vec![]), fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;

    let result = ctx
        .sign_in(&LoginRequest {
            email: "dev@shoky.test".to_string(),
            password: "wrong".to_string(),
        })
        .await;

    assert_eq!(result.unwrap_err(), IdentityError::InvalidCredentials);
    assert_eq!(ctx.snapshot(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn test_missing_profile_fails_closed() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("ghost@shoky.test", user_id)]);

    let ctx = AuthContext::new(identity, FakeProfiles::new(vec![]), fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;

    let state = signed_in(&ctx, "ghost@shoky.test").await;
    assert!(matches!(
        state,
        AuthState::ProfileMissing {
            reason: MissingReason::NotFound,
            ..
        }
    ));
    assert!(state.role().is_none());
}

#[tokio::test]
async fn test_profile_for_other_user_is_rejected() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![]);
    // Stored under the right key but claiming another identity.
    profiles
        .rows
        .lock()
        .unwrap()
        .insert(user_id, profile(Uuid::new_v4(), "dev@shoky.test", Role::SuperAdmin));

    let ctx = AuthContext::new(identity, profiles, fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;

    let state = signed_in(&ctx, "dev@shoky.test").await;
    assert!(matches!(
        state,
        AuthState::ProfileMissing {
            reason: MissingReason::Mismatch,
            ..
        }
    ));
}

#[tokio::test]
async fn test_transient_fetch_failures_are_retried() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);
    profiles.transient_failures.store(2, Ordering::SeqCst);

    let ctx = AuthContext::new(identity, profiles.clone(), fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;

    let state = signed_in(&ctx, "dev@shoky.test").await;
    assert_eq!(state.role(), Some(Role::Developer));
    assert_eq!(profiles.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_exhausted_retries_resolve_to_fetch_failed() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);
    profiles.transient_failures.store(10, Ordering::SeqCst);

    let ctx = AuthContext::new(identity, profiles.clone(), fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;

    let state = signed_in(&ctx, "dev@shoky.test").await;
    assert!(matches!(
        state,
        AuthState::ProfileMissing {
            reason: MissingReason::FetchFailed,
            ..
        }
    ));
    assert_eq!(profiles.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_stale_profile_result_is_discarded() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("first@shoky.test", first), ("second@shoky.test", second)]);
    let profiles = FakeProfiles::new(vec![
        profile(first, "first@shoky.test", Role::SuperAdmin),
        profile(second, "second@shoky.test", Role::Developer),
    ]);
    profiles.hold(first);

    let ctx = AuthContext::new(identity, profiles.clone(), fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;

    ctx.sign_in(&credentials("first@shoky.test")).await.unwrap();
    wait_until(&ctx, |state| {
        matches!(state, AuthState::ResolvingProfile { session } if session.user_id == first)
    })
    .await;

    let state = signed_in(&ctx, "second@shoky.test").await;
    assert_eq!(state.role(), Some(Role::Developer));

    profiles.release();
    while profiles.fetches.load(Ordering::SeqCst) < 2 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = ctx.snapshot();
    assert_eq!(state.role(), Some(Role::Developer));
    assert_eq!(state.session().map(|s| s.user_id), Some(second));
}

#[tokio::test]
async fn test_repeated_notification_is_ignored() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);

    let ctx = AuthContext::new(identity.clone(), profiles.clone(), fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;
    let state = signed_in(&ctx, "dev@shoky.test").await;

    let states = ctx.subscribe();
    identity.publish(state.session().cloned());
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!states.has_changed().unwrap());
    assert_eq!(profiles.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_expiry_notification_signs_out() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);

    let ctx = AuthContext::new(identity.clone(), profiles, fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;
    signed_in(&ctx, "dev@shoky.test").await;

    identity.publish(None);
    let state = wait_until(&ctx, |state| *state == AuthState::Unauthenticated).await;
    assert!(state.profile().is_none());
}

#[tokio::test]
async fn test_sign_out() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);

    let ctx = AuthContext::new(identity, profiles, fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;
    signed_in(&ctx, "dev@shoky.test").await;

    ctx.sign_out().await.unwrap();
    assert_eq!(ctx.snapshot(), AuthState::Unauthenticated);
}

#[tokio::test]
async fn test_failed_sign_out_keeps_session() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);

    let ctx = AuthContext::new(identity.clone(), profiles, fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;
    let before = signed_in(&ctx, "dev@shoky.test").await;

    identity.fail_sign_out.store(true, Ordering::SeqCst);
    assert!(ctx.sign_out().await.is_err());
    assert_eq!(ctx.snapshot(), before);
}

#[tokio::test]
async fn test_upgrade_to_super_admin() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);

    let ctx = AuthContext::new(identity, profiles, fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;
    signed_in(&ctx, "dev@shoky.test").await;

    assert!(ctx.upgrade_to_super_admin().await.unwrap());
    let state = wait_until(&ctx, |state| state.role() == Some(Role::SuperAdmin)).await;
    assert_eq!(state.session().map(|s| s.user_id), Some(user_id));

    assert!(!ctx.upgrade_to_super_admin().await.unwrap());
}

async fn wait_for_update(profiles: &FakeProfiles) {
    while profiles.updates_started.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_sign_out_during_upgrade_stays_signed_out() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);
    profiles.hold_updates.store(true, Ordering::SeqCst);

    let ctx = AuthContext::new(identity, profiles.clone(), fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;
    signed_in(&ctx, "dev@shoky.test").await;

    let upgrade = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        async move { ctx.upgrade_to_super_admin().await }
    });
    wait_for_update(&profiles).await;

    ctx.sign_out().await.unwrap();
    assert_eq!(ctx.snapshot(), AuthState::Unauthenticated);

    profiles.release_update();
    assert!(upgrade.await.unwrap().unwrap());
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(ctx.snapshot(), AuthState::Unauthenticated);
    assert_eq!(profiles.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_new_session_during_upgrade_is_kept() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("first@shoky.test", first), ("second@shoky.test", second)]);
    let profiles = FakeProfiles::new(vec![
        profile(first, "first@shoky.test", Role::Developer),
        profile(second, "second@shoky.test", Role::HrAdmin),
    ]);
    profiles.hold_updates.store(true, Ordering::SeqCst);

    let ctx = AuthContext::new(identity, profiles.clone(), fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;
    signed_in(&ctx, "first@shoky.test").await;

    let upgrade = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        async move { ctx.upgrade_to_super_admin().await }
    });
    wait_for_update(&profiles).await;

    let replaced = signed_in(&ctx, "second@shoky.test").await;
    assert_eq!(replaced.role(), Some(Role::HrAdmin));

    profiles.release_update();
    assert!(upgrade.await.unwrap().unwrap());
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = ctx.snapshot();
    assert_eq!(state, replaced);
    assert_eq!(state.session().map(|s| s.user_id), Some(second));
    assert_eq!(profiles.rows.lock().unwrap()[&first].role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_upgrade_requires_profile() {
    let ctx = AuthContext::new(FakeIdentity::new(&[]), FakeProfiles::new(vec![]), fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;

    assert!(matches!(
        ctx.upgrade_to_super_admin().await,
        Err(UpgradeError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_shutdown_stops_following_provider() {
    let user_id = Uuid::new_v4();
    let identity = FakeIdentity::new(&[("dev@shoky.test", user_id)]);
    let profiles = FakeProfiles::new(vec![profile(user_id, "dev@shoky.test", Role::Developer)]);

    let ctx = AuthContext::new(identity.clone(), profiles, fast_config());
    ctx.initialize().await;
    ctx.wait_until_settled().await;
    let before = signed_in(&ctx, "dev@shoky.test").await;

    ctx.shutdown();
    identity.publish(None);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(ctx.snapshot(), before);
}
