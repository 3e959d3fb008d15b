//! # Shoky Models
//!
//! Domain models and DTOs for Shoky Hub.
//!
//! # Modules
//!
//! - [`roles`]: the closed [`Role`] and [`UserStatus`] enumerations and [`RoleSet`]
//! - [`profiles`]: the application-level [`Profile`] record
//! - [`auth`]: [`Session`] plus login / logout DTOs and the serialised auth state
//! - [`navigation`]: icon tags, navigation entries and the role badge
//! - [`pages`]: page views rendered by the dashboard routes
//!
//! # Example
//!
//! ```ignore
//! use shoky_models::{Role, RoleSet};
//!
//! let hr_pages = RoleSet::of(&[Role::SuperAdmin, Role::HrAdmin]);
//! assert!(hr_pages.contains(Role::HrAdmin));
//! assert!(!hr_pages.contains(Role::Developer));
//! ```

pub mod auth;
pub mod navigation;
pub mod pages;
pub mod profiles;
pub mod roles;

pub use auth::{
    AuthStateResponse, AuthStatus, ErrorResponse, LoginRequest, LoginResponse, MessageResponse,
    Session, SessionInfo,
};
pub use navigation::{Icon, NavEntry, NavigationResponse, RoleBadge};
pub use pages::{
    AuthView, DashboardGreeting, LandingView, LoadingView, NotFoundView, PageContent, PageView,
    RoleFeature,
};
pub use profiles::{CreateMemberDto, Profile, UpgradeRoleResponse};
pub use roles::{Role, RoleSet, UnknownRole, UnknownStatus, UserStatus};
