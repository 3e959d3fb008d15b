//! Authentication models and DTOs.
//!
//! [`Session`] is the in-process view of a verified identity. It is never
//! serialised as-is: API responses use [`SessionInfo`], which leaves the
//! bearer token out.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::profiles::Profile;

/// A live session issued by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            user_id: self.user_id,
            email: self.email.clone(),
            expires_at: self.expires_at,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Public part of a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionInfo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Login request with email and password.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl From<&Session> for LoginResponse {
    fn from(session: &Session) -> Self {
        Self {
            access_token: session.access_token.clone(),
            token_type: "Bearer".to_string(),
            session_id: session.id,
            user_id: session.user_id,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Discriminant of the auth state, as exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Initializing,
    Unauthenticated,
    ResolvingProfile,
    Authenticated,
    ProfileMissing,
}

impl AuthStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuthStatus::Initializing => "initializing",
            AuthStatus::Unauthenticated => "unauthenticated",
            AuthStatus::ResolvingProfile => "resolving_profile",
            AuthStatus::Authenticated => "authenticated",
            AuthStatus::ProfileMissing => "profile_missing",
        }
    }
}

/// Serialised snapshot of the caller's auth state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthStateResponse {
    pub status: AuthStatus,
    pub session: Option<SessionInfo>,
    pub profile: Option<Profile>,
}
