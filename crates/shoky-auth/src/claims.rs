//! JWT claims carried by a session token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shoky_core::AppError;

/// Claims embedded in every session access token.
///
/// The token only proves which session it belongs to. Role data is never
/// placed in the token: it is read from the profile store on every
/// resolution so a role change takes effect without re-issuing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// Server-side session row ID
    pub sid: String,
    pub email: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: usize,
    /// Issued-at timestamp (Unix seconds)
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn session_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sid)
            .map_err(|_| AppError::unauthorized("Invalid session ID in token".to_string()))
    }
}
