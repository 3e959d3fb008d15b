//! The authorization gate.
//!
//! [`evaluate`] is a pure function of the auth state and the guard of a
//! destination. It is re-run on every state change and never cached.

use shoky_auth::{AuthState, MissingReason};
use shoky_models::{Role, RoleSet};

/// The login surface.
pub const LOGIN_PATH: &str = "/auth";
/// Where signed-in members land, and where under-privileged ones are sent.
pub const DEFAULT_AUTHENTICATED_PATH: &str = "/dashboard";

/// Guard of one protected destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuardSpec {
    /// `None` admits any authenticated role.
    pub allowed_roles: Option<RoleSet>,
}

impl RouteGuardSpec {
    pub const ANY_AUTHENTICATED: RouteGuardSpec = RouteGuardSpec {
        allowed_roles: None,
    };

    pub const fn only(roles: &[Role]) -> Self {
        RouteGuardSpec {
            allowed_roles: Some(RoleSet::of(roles)),
        }
    }

    pub fn admits(&self, role: Role) -> bool {
        match self.allowed_roles {
            None => true,
            Some(roles) => role_permits(roles, role),
        }
    }
}

/// Why the caller is being sent to the login surface. Only logged; the
/// user-visible outcome is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    Unauthenticated,
    ProfileMissing(MissingReason),
}

impl DenialReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenialReason::Unauthenticated => "unauthenticated",
            DenialReason::ProfileMissing(_) => "profile_missing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth is still resolving; show a neutral placeholder, decide later.
    Loading,
    RedirectToLogin { reason: DenialReason },
    /// Valid member, role not in the allow-list.
    RedirectToDefault,
    Render,
}

impl GuardDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            GuardDecision::Loading => "loading",
            GuardDecision::RedirectToLogin { .. } => "redirect_login",
            GuardDecision::RedirectToDefault => "redirect_default",
            GuardDecision::Render => "render",
        }
    }

    /// Target of the redirect, if this decision is one.
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            GuardDecision::RedirectToLogin { .. } => Some(LOGIN_PATH),
            GuardDecision::RedirectToDefault => Some(DEFAULT_AUTHENTICATED_PATH),
            GuardDecision::Loading | GuardDecision::Render => None,
        }
    }
}

/// Role membership used by both the gate and the navigation filter.
///
/// There is no hierarchy: `SuperAdmin` passes only where it is listed.
pub fn role_permits(allowed: RoleSet, role: Role) -> bool {
    allowed.contains(role)
}

pub fn evaluate(state: &AuthState, guard: &RouteGuardSpec) -> GuardDecision {
    match state {
        AuthState::Initializing | AuthState::ResolvingProfile { .. } => GuardDecision::Loading,
        AuthState::Unauthenticated => GuardDecision::RedirectToLogin {
            reason: DenialReason::Unauthenticated,
        },
        AuthState::ProfileMissing { reason, .. } => GuardDecision::RedirectToLogin {
            reason: DenialReason::ProfileMissing(*reason),
        },
        AuthState::Authenticated { profile, .. } if guard.admits(profile.role) => {
            GuardDecision::Render
        }
        AuthState::Authenticated { .. } => GuardDecision::RedirectToDefault,
    }
}
