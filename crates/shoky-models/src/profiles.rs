//! Profile domain model and DTOs.
//!
//! A profile extends an identity with the member's role and status. Its `id`
//! is the user id of the session it belongs to.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::roles::{Role, UserStatus};

/// One row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub hire_date: Option<chrono::NaiveDate>,
    pub last_login_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Credentials and profile data for a new member.
///
/// Members are provisioned from the CLI; there is no public sign-up route.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMemberDto {
    #[validate(length(min = 1, message = "full_name is required"))]
    pub full_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
}

/// Result of the self-upgrade affordance.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpgradeRoleResponse {
    pub profile: Profile,
    /// `false` when the profile already held the super admin role.
    pub upgraded: bool,
}
