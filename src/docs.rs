use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use shoky_models::{
    AuthStateResponse, AuthStatus, ErrorResponse, Icon, LoginRequest, LoginResponse,
    MessageResponse, NavEntry, NavigationResponse, Profile, Role, RoleBadge, SessionInfo,
    UpgradeRoleResponse, UserStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::auth_state,
        crate::modules::navigation::controller::get_navigation,
        crate::modules::profiles::controller::get_my_profile,
        crate::modules::profiles::controller::upgrade_my_profile,
    ),
    components(
        schemas(
            Role,
            UserStatus,
            Profile,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ErrorResponse,
            SessionInfo,
            AuthStatus,
            AuthStateResponse,
            Icon,
            NavEntry,
            RoleBadge,
            NavigationResponse,
            UpgradeRoleResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sessions: sign in, sign out and the resolved auth state"),
        (name = "Navigation", description = "Role-filtered navigation"),
        (name = "Profiles", description = "The signed-in member's profile")
    ),
    info(
        title = "Shoky Hub API",
        version = "0.1.0",
        description = "Role-based community management dashboard built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
