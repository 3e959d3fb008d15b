//! Profile resolution policy for the auth context.
//!
//! A profile fetch that fails with a transient error is retried with
//! exponential backoff. Once the attempts are exhausted the session resolves
//! to "profile missing" rather than waiting forever.
//!
//! # Environment Variables
//!
//! - `PROFILE_FETCH_ATTEMPTS`: total attempts per session generation (default: 3, minimum: 1)
//! - `PROFILE_FETCH_BACKOFF_MS`: delay before the first retry in milliseconds (default: 200)

use std::env;
use std::time::Duration;

/// Upper bound for a single backoff delay.
const MAX_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub profile_fetch_attempts: u32,
    pub profile_fetch_backoff: Duration,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let attempts = env::var("PROFILE_FETCH_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);
        let backoff_ms = env::var("PROFILE_FETCH_BACKOFF_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(200);

        Self::new(attempts, Duration::from_millis(backoff_ms))
    }

    pub fn new(profile_fetch_attempts: u32, profile_fetch_backoff: Duration) -> Self {
        Self {
            profile_fetch_attempts: profile_fetch_attempts.max(1),
            profile_fetch_backoff,
        }
    }

    /// Delay before retry number `retry` (0-based), doubling each time.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.min(16)).unwrap_or(u32::MAX);
        self.profile_fetch_backoff
            .saturating_mul(factor)
            .min(MAX_BACKOFF)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}
