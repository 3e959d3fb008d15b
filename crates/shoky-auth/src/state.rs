//! The discriminated auth state.
//!
//! One value replaces the usual trio of `user`, `profile` and `loading`
//! flags, so impossible combinations (a profile without a session, a
//! profile for somebody else's session) cannot be represented.

use tracing::{error, warn};

use shoky_models::{AuthStateResponse, AuthStatus, Profile, Role, Session};

use crate::provider::ProfileStoreError;

/// Why a valid session ended up without a usable profile.
///
/// Logged for operators; users see the same login redirect for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    /// No profile row for the session's user id.
    NotFound,
    /// A row came back whose id is not the session's user id.
    Mismatch,
    /// The store kept failing until retries ran out.
    FetchFailed,
    /// The row holds a role or status outside the closed enumerations.
    InvalidRow,
}

impl MissingReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            MissingReason::NotFound => "not_found",
            MissingReason::Mismatch => "mismatch",
            MissingReason::FetchFailed => "fetch_failed",
            MissingReason::InvalidRow => "invalid_row",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No session check has completed yet.
    #[default]
    Initializing,
    /// Confirmed: there is no valid session.
    Unauthenticated,
    /// Valid session, profile fetch in flight.
    ResolvingProfile { session: Session },
    /// Valid session with its matching profile.
    Authenticated { session: Session, profile: Profile },
    /// Valid session but no usable profile. A hard denial.
    ProfileMissing {
        session: Session,
        reason: MissingReason,
    },
}

impl AuthState {
    /// Settles a session against the outcome of its profile lookup.
    ///
    /// Fails closed: anything other than a row whose id equals the session's
    /// user id yields [`AuthState::ProfileMissing`].
    pub fn resolve(
        session: Session,
        lookup: Result<Option<Profile>, ProfileStoreError>,
    ) -> AuthState {
        match lookup {
            Ok(Some(profile)) if profile.id == session.user_id => {
                AuthState::Authenticated { session, profile }
            }
            Ok(Some(profile)) => {
                error!(
                    session_user_id = %session.user_id,
                    profile_id = %profile.id,
                    "Profile does not belong to the session user"
                );
                AuthState::ProfileMissing {
                    session,
                    reason: MissingReason::Mismatch,
                }
            }
            Ok(None) => {
                warn!(user_id = %session.user_id, "No profile row for session user");
                AuthState::ProfileMissing {
                    session,
                    reason: MissingReason::NotFound,
                }
            }
            Err(ProfileStoreError::Integrity(detail)) => {
                error!(user_id = %session.user_id, %detail, "Profile row failed integrity checks");
                AuthState::ProfileMissing {
                    session,
                    reason: MissingReason::InvalidRow,
                }
            }
            Err(err) => {
                warn!(user_id = %session.user_id, error = %err, "Profile resolution failed");
                AuthState::ProfileMissing {
                    session,
                    reason: MissingReason::FetchFailed,
                }
            }
        }
    }

    pub fn status(&self) -> AuthStatus {
        match self {
            AuthState::Initializing => AuthStatus::Initializing,
            AuthState::Unauthenticated => AuthStatus::Unauthenticated,
            AuthState::ResolvingProfile { .. } => AuthStatus::ResolvingProfile,
            AuthState::Authenticated { .. } => AuthStatus::Authenticated,
            AuthState::ProfileMissing { .. } => AuthStatus::ProfileMissing,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Initializing | AuthState::Unauthenticated => None,
            AuthState::ResolvingProfile { session }
            | AuthState::Authenticated { session, .. }
            | AuthState::ProfileMissing { session, .. } => Some(session),
        }
    }

    /// The profile, only ever present together with its matching session.
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            AuthState::Authenticated { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.profile().map(|profile| profile.role)
    }

    /// `false` while a decision would still be premature.
    pub fn is_settled(&self) -> bool {
        !matches!(
            self,
            AuthState::Initializing | AuthState::ResolvingProfile { .. }
        )
    }

    pub fn to_response(&self) -> AuthStateResponse {
        AuthStateResponse {
            status: self.status(),
            session: self.session().map(Session::info),
            profile: self.profile().cloned(),
        }
    }
}
