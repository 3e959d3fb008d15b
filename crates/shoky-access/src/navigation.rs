//! The static navigation table and its per-role filter.

use shoky_auth::AuthState;
use shoky_models::Role::{Developer, HrAdmin, SocialMediaAdmin, SuperAdmin};
use shoky_models::{Icon, NavEntry, Role, RoleSet};

use crate::gate::role_permits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub title: &'static str,
    pub href: &'static str,
    pub icon: Icon,
    pub roles: RoleSet,
}

/// Sidebar order. Filtering keeps this order.
pub const NAVIGATION: &[NavItem] = &[
    NavItem {
        title: "Dashboard",
        href: "/dashboard",
        icon: Icon::LayoutDashboard,
        roles: RoleSet::ALL,
    },
    NavItem {
        title: "User Management",
        href: "/users",
        icon: Icon::UserPlus,
        roles: RoleSet::of(&[SuperAdmin]),
    },
    NavItem {
        title: "Analytics",
        href: "/analytics",
        icon: Icon::BarChart3,
        roles: RoleSet::of(&[SuperAdmin]),
    },
    NavItem {
        title: "Tasks",
        href: "/tasks",
        icon: Icon::CheckSquare,
        roles: RoleSet::of(&[SuperAdmin, HrAdmin, Developer]),
    },
    NavItem {
        title: "Kanban Board",
        href: "/kanban",
        icon: Icon::GitBranch,
        roles: RoleSet::of(&[SuperAdmin, Developer]),
    },
    NavItem {
        title: "Attendance",
        href: "/attendance",
        icon: Icon::UserCheck,
        roles: RoleSet::of(&[SuperAdmin, HrAdmin]),
    },
    NavItem {
        title: "Performance Reviews",
        href: "/reviews",
        icon: Icon::ClipboardList,
        roles: RoleSet::of(&[SuperAdmin, HrAdmin]),
    },
    NavItem {
        title: "Announcements",
        href: "/announcements",
        icon: Icon::Megaphone,
        roles: RoleSet::of(&[SuperAdmin, HrAdmin]),
    },
    NavItem {
        title: "Content Planning",
        href: "/content",
        icon: Icon::Camera,
        roles: RoleSet::of(&[SuperAdmin, SocialMediaAdmin]),
    },
    NavItem {
        title: "Content Calendar",
        href: "/calendar",
        icon: Icon::Calendar,
        roles: RoleSet::of(&[SuperAdmin, SocialMediaAdmin]),
    },
    NavItem {
        title: "Assets",
        href: "/assets",
        icon: Icon::FolderOpen,
        roles: RoleSet::ALL,
    },
];

pub fn visible_for_role(role: Role) -> impl Iterator<Item = &'static NavItem> {
    NAVIGATION
        .iter()
        .filter(move |item| role_permits(item.roles, role))
}

/// Visible items for the current state; empty unless authenticated.
pub fn filter_navigation(state: &AuthState) -> Vec<&'static NavItem> {
    match state.role() {
        Some(role) => visible_for_role(role).collect(),
        None => Vec::new(),
    }
}

/// Visible items as DTOs, marking the one matching `active_path`.
pub fn nav_entries(state: &AuthState, active_path: &str) -> Vec<NavEntry> {
    filter_navigation(state)
        .into_iter()
        .map(|item| NavEntry {
            title: item.title.to_string(),
            href: item.href.to_string(),
            icon: item.icon,
            active: item.href == active_path,
        })
        .collect()
}
