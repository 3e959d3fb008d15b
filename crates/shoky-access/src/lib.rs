//! # Shoky Access
//!
//! Role-based access decisions, all pure functions of an [`AuthState`]
//! snapshot:
//!
//! - [`gate`]: the authorization gate for one guarded destination
//! - [`routes`]: the protected page table and the guard of each page
//! - [`navigation`]: the static navigation table and its per-role filter
//! - [`presentation`]: role labels, icons and accent colors
//!
//! The gate and the navigation filter share one membership test
//! ([`gate::role_permits`]), so a visible navigation item is always a
//! reachable page and the other way round.
//!
//! # Example
//!
//! ```ignore
//! use shoky_access::{GuardDecision, evaluate, routes};
//!
//! let page = routes::find("/kanban").unwrap();
//! match evaluate(&state, &page.guard) {
//!     GuardDecision::Render => render(page),
//!     GuardDecision::Loading => spinner(),
//!     GuardDecision::RedirectToLogin { .. } => redirect("/auth"),
//!     GuardDecision::RedirectToDefault => redirect("/dashboard"),
//! }
//! ```
//!
//! [`AuthState`]: shoky_auth::AuthState

pub mod gate;
pub mod navigation;
pub mod presentation;
pub mod routes;

pub use gate::{
    DEFAULT_AUTHENTICATED_PATH, DenialReason, GuardDecision, LOGIN_PATH, RouteGuardSpec, evaluate,
    role_permits,
};
pub use navigation::{NAVIGATION, NavItem, filter_navigation, nav_entries, visible_for_role};
pub use presentation::{
    RolePresentation, badge, dashboard_greeting, landing_features, presentation, presentation_for_str,
};
pub use routes::{PROTECTED_ROUTES, ProtectedRoute, find};
