//! Middleware and extractors for request authentication.
//!
//! # Modules
//!
//! - [`auth`]: per-request auth resolution and the `CurrentAuth`,
//!   `AuthSession` and `RequireProfile` extractors
//! - [`guard`]: the authorization gate applied to every page route
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. The token is verified and its session row must be live
//! 3. The profile is fetched (transient failures retried) and checked
//!    against the session's user id
//! 4. Page routes: the gate renders, or redirects with `303 See Other`
//! 5. API routes: extractors reject with 401 / 403
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequireProfile;
//!
//! async fn me(RequireProfile { profile, .. }: RequireProfile) -> Json<Profile> {
//!     Json(profile)
//! }
//! ```

pub mod auth;
pub mod guard;
