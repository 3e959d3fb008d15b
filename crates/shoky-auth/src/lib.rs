//! # Shoky Auth
//!
//! Who is the caller, and what role do they hold.
//!
//! - [`claims`] / [`jwt`]: signed session tokens issued at sign-in
//! - [`provider`]: the [`IdentityProvider`] and [`ProfileStore`] ports
//! - [`state`]: the discriminated [`AuthState`]
//! - [`context`]: [`AuthContext`], the single writer of the auth state
//!
//! # Data flow
//!
//! ```text
//! IdentityProvider --session change--> AuthContext --watch--> gate / navigation / UI
//!                                          |
//!                                          +--fetch_profile_by_id--> ProfileStore
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shoky_auth::{AuthContext, AuthState};
//!
//! let ctx = AuthContext::new(identity, profiles, SessionConfig::from_env());
//! ctx.initialize().await;
//!
//! let mut states = ctx.subscribe();
//! while states.changed().await.is_ok() {
//!     if let AuthState::Authenticated { profile, .. } = &*states.borrow() {
//!         println!("signed in as {}", profile.role);
//!     }
//! }
//! ```

pub mod claims;
pub mod context;
pub mod jwt;
pub mod provider;
pub mod state;

pub use claims::Claims;
pub use context::{AuthContext, UpgradeError};
pub use jwt::{create_session_token, verify_session_token};
pub use provider::{
    IdentityError, IdentityProvider, ProfileStore, ProfileStoreError, SessionChange,
    fetch_profile_with_retry,
};
pub use state::{AuthState, MissingReason};
