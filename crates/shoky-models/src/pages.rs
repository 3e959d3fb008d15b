//! Page views returned by the dashboard routes.

use serde::Serialize;
use utoipa::ToSchema;

use crate::navigation::{Icon, NavEntry, RoleBadge};
use crate::roles::Role;

/// A protected page, rendered only after the gate admits the caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageView {
    pub path: String,
    pub title: String,
    pub badge: RoleBadge,
    pub navigation: Vec<NavEntry>,
    pub content: PageContent,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContent {
    Dashboard { greeting: DashboardGreeting },
    Placeholder { heading: String, message: String },
}

/// Role-specific greeting shown on `/dashboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardGreeting {
    pub title: String,
    pub description: String,
    pub icon: Icon,
    pub color: String,
    pub features: Vec<String>,
}

/// Public landing page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LandingView {
    pub name: String,
    pub tagline: String,
    pub roles: Vec<RoleFeature>,
    pub login_path: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleFeature {
    pub role: Role,
    pub title: String,
    pub description: String,
    pub icon: Icon,
    pub color: String,
}

/// The login surface.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthView {
    pub login_endpoint: String,
    pub message: String,
}

/// Neutral placeholder while the caller's auth state is still resolving.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoadingView {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotFoundView {
    pub path: String,
    pub message: String,
}
