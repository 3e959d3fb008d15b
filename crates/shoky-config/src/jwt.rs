use std::env;
use std::fmt;

const DEV_SECRET: &str = "shoky-dev-secret-change-me";
const DEFAULT_SESSION_SECONDS: i64 = 60 * 60;

/// Signing key and lifetime for session tokens.
///
/// `Debug` never prints the secret.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Session lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    /// Reads `JWT_SECRET` and `JWT_ACCESS_EXPIRY`. Without `JWT_SECRET` a
    /// development key is used.
    pub fn from_env() -> Self {
        let access_token_expiry = env::var("JWT_ACCESS_EXPIRY")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|seconds| *seconds > 0)
            .unwrap_or(DEFAULT_SESSION_SECONDS);

        Self {
            secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEV_SECRET.to_string()),
            access_token_expiry,
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}
