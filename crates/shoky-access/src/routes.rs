//! Protected pages and their guards.
//!
//! Each navigation destination has exactly one entry here with the same
//! allow-list as its navigation item.

use shoky_models::Role::{Developer, HrAdmin, SocialMediaAdmin, SuperAdmin};

use crate::gate::RouteGuardSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub path: &'static str,
    pub title: &'static str,
    pub guard: RouteGuardSpec,
}

pub const PROTECTED_ROUTES: &[ProtectedRoute] = &[
    ProtectedRoute {
        path: "/dashboard",
        title: "Dashboard",
        guard: RouteGuardSpec::ANY_AUTHENTICATED,
    },
    ProtectedRoute {
        path: "/users",
        title: "User Management",
        guard: RouteGuardSpec::only(&[SuperAdmin]),
    },
    ProtectedRoute {
        path: "/analytics",
        title: "Analytics",
        guard: RouteGuardSpec::only(&[SuperAdmin]),
    },
    ProtectedRoute {
        path: "/tasks",
        title: "Task Management",
        guard: RouteGuardSpec::only(&[SuperAdmin, HrAdmin, Developer]),
    },
    ProtectedRoute {
        path: "/kanban",
        title: "Kanban Board",
        guard: RouteGuardSpec::only(&[SuperAdmin, Developer]),
    },
    ProtectedRoute {
        path: "/attendance",
        title: "Attendance",
        guard: RouteGuardSpec::only(&[SuperAdmin, HrAdmin]),
    },
    ProtectedRoute {
        path: "/reviews",
        title: "Performance Reviews",
        guard: RouteGuardSpec::only(&[SuperAdmin, HrAdmin]),
    },
    ProtectedRoute {
        path: "/announcements",
        title: "Announcements",
        guard: RouteGuardSpec::only(&[SuperAdmin, HrAdmin]),
    },
    ProtectedRoute {
        path: "/content",
        title: "Content Planning",
        guard: RouteGuardSpec::only(&[SuperAdmin, SocialMediaAdmin]),
    },
    ProtectedRoute {
        path: "/calendar",
        title: "Content Calendar",
        guard: RouteGuardSpec::only(&[SuperAdmin, SocialMediaAdmin]),
    },
    ProtectedRoute {
        path: "/assets",
        title: "Assets",
        guard: RouteGuardSpec::only(&[SuperAdmin, HrAdmin, SocialMediaAdmin, Developer]),
    },
];

pub fn find(path: &str) -> Option<&'static ProtectedRoute> {
    PROTECTED_ROUTES.iter().find(|route| route.path == path)
}
