//! Session token issue and verification.
//!
//! A token is only half of a session: it names a session row that the
//! identity provider can revoke. Verifying the signature here proves the
//! token was issued by us; the provider still checks the row is live.
//!
//! # Example
//!
//! ```ignore
//! use shoky_auth::{create_session_token, verify_session_token};
//!
//! let token = create_session_token(user_id, session_id, "member@shoky.test", expires_at, &config)?;
//! let claims = verify_session_token(&token, &config)?;
//! assert_eq!(claims.session_id()?, session_id);
//! ```

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use shoky_config::JwtConfig;
use shoky_core::AppError;

use crate::claims::Claims;

/// Signs a token for an already persisted session.
///
/// `expires_at` must match the session row so the token and the row expire
/// together.
pub fn create_session_token(
    user_id: Uuid,
    session_id: Uuid,
    email: &str,
    expires_at: DateTime<Utc>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp().max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        sid: session_id.to_string(),
        email: email.to_string(),
        exp: expires_at.timestamp().max(0) as usize,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry, returning the embedded claims.
pub fn verify_session_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}
