//! Display metadata per role.
//!
//! Every lookup is an exhaustive `match` over [`Role`], so adding a role
//! fails to compile until it has a presentation. Raw strings go through
//! [`presentation_for_str`], which rejects anything outside the enum.

use shoky_models::{DashboardGreeting, Icon, Profile, Role, RoleBadge, RoleFeature, UnknownRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePresentation {
    pub label: &'static str,
    pub icon: Icon,
    pub color: &'static str,
    pub background: &'static str,
}

pub const fn presentation(role: Role) -> RolePresentation {
    match role {
        Role::SuperAdmin => RolePresentation {
            label: "Super Admin",
            icon: Icon::Crown,
            color: "text-yellow-600",
            background: "bg-yellow-50",
        },
        Role::HrAdmin => RolePresentation {
            label: "HR Admin",
            icon: Icon::Briefcase,
            color: "text-green-600",
            background: "bg-green-50",
        },
        Role::SocialMediaAdmin => RolePresentation {
            label: "Social Media Admin",
            icon: Icon::Camera,
            color: "text-purple-600",
            background: "bg-purple-50",
        },
        Role::Developer => RolePresentation {
            label: "Developer",
            icon: Icon::Code,
            color: "text-blue-600",
            background: "bg-blue-50",
        },
    }
}

pub fn presentation_for_str(raw: &str) -> Result<RolePresentation, UnknownRole> {
    raw.parse::<Role>().map(presentation)
}

pub fn badge(profile: &Profile) -> RoleBadge {
    let p = presentation(profile.role);
    RoleBadge {
        full_name: profile.full_name.clone(),
        role: profile.role,
        label: p.label.to_string(),
        icon: p.icon,
        color: p.color.to_string(),
        background: p.background.to_string(),
    }
}

pub fn dashboard_greeting(role: Role) -> DashboardGreeting {
    let p = presentation(role);
    let (title, description, features): (&str, &str, [&str; 5]) = match role {
        Role::SuperAdmin => (
            "Super Admin Dashboard",
            "Full system control and oversight",
            [
                "Complete system management",
                "User role assignment",
                "Analytics and reporting",
                "Content approval workflow",
                "Task assignment and tracking",
            ],
        ),
        Role::HrAdmin => (
            "HR Admin Dashboard",
            "People management and operations",
            [
                "Employee management",
                "Attendance tracking",
                "Performance reviews",
                "Announcements",
                "Report generation",
            ],
        ),
        Role::SocialMediaAdmin => (
            "Social Media Dashboard",
            "Content creation and planning",
            [
                "Content calendar management",
                "Creative asset access",
                "Content approval workflow",
                "Media file management",
                "Campaign planning",
            ],
        ),
        Role::Developer => (
            "Developer Dashboard",
            "Technical tasks and development",
            [
                "Kanban task board",
                "Code repository access",
                "Technical documentation",
                "Project timeline tracking",
                "Task status updates",
            ],
        ),
    };

    DashboardGreeting {
        title: title.to_string(),
        description: description.to_string(),
        icon: p.icon,
        color: p.color.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

/// Role cards of the public landing page.
pub fn landing_features() -> Vec<RoleFeature> {
    Role::ALL
        .into_iter()
        .map(|role| {
            let p = presentation(role);
            let (title, description) = match role {
                Role::SuperAdmin => (
                    "Super Admin Control",
                    "Complete system management with user role assignment and analytics",
                ),
                Role::HrAdmin => (
                    "HR Management",
                    "Employee tracking, performance reviews, and attendance management",
                ),
                Role::SocialMediaAdmin => (
                    "Social Media Planning",
                    "Content calendar, approval workflows, and creative asset management",
                ),
                Role::Developer => (
                    "Developer Tools",
                    "Kanban boards, task management, and technical documentation",
                ),
            };
            RoleFeature {
                role,
                title: title.to_string(),
                description: description.to_string(),
                icon: p.icon,
                color: format!("{} {}", p.color, p.background),
            }
        })
        .collect()
}
