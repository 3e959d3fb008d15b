//! Navigation and role badge DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::roles::Role;

/// Icon tag understood by the front end's icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Users,
    Crown,
    Briefcase,
    Camera,
    Code,
    LayoutDashboard,
    UserPlus,
    BarChart3,
    CheckSquare,
    GitBranch,
    UserCheck,
    ClipboardList,
    Megaphone,
    Calendar,
    FolderOpen,
}

/// One visible navigation item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavEntry {
    pub title: String,
    pub href: String,
    pub icon: Icon,
    /// Whether this entry points at the page being rendered.
    pub active: bool,
}

/// Who is signed in and how their role is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RoleBadge {
    pub full_name: String,
    pub role: Role,
    pub label: String,
    pub icon: Icon,
    pub color: String,
    pub background: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NavigationResponse {
    pub badge: Option<RoleBadge>,
    pub items: Vec<NavEntry>,
}
