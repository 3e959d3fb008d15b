use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use shoky_core::{AppError, hash_password};
use shoky_models::{CreateMemberDto, Profile, Role};

pub(crate) const PROFILE_COLUMNS: &str = "id, full_name, email, role, status, department, phone, \
     avatar_url, hire_date, last_login_at, created_at, updated_at";

pub struct ProfileService;

impl ProfileService {
    /// `Ok(None)` when the user has no profile row.
    #[instrument(skip(db))]
    pub async fn fetch_profile(db: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    #[instrument(skip(db))]
    pub async fn update_role(db: &PgPool, user_id: Uuid, role: Role) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET role = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(role)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Profile not found")))
    }

    #[instrument(skip(db))]
    pub async fn set_role_by_email(db: &PgPool, email: &str, role: Role) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET role = $2, updated_at = NOW() WHERE email = $1 \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(email)
        .bind(role)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No member with email {}", email)))
    }

    /// Creates the credential row and its profile in one transaction.
    #[instrument(skip(db, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn create_member(db: &PgPool, dto: CreateMemberDto) -> Result<Profile, AppError> {
        let hashed_password = hash_password(&dto.password)?;
        Self::insert_member(db, &dto.full_name, &dto.email, &hashed_password, dto.role).await
    }

    /// Inserts a member whose password is already hashed.
    pub async fn insert_member(
        db: &PgPool,
        full_name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Profile, AppError> {
        let mut tx = db.begin().await?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (email, password) VALUES ($1, $2) \
             ON CONFLICT (email) DO NOTHING RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Email already exists")))?;

        let profile = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (id, full_name, email, role) VALUES ($1, $2, $3, $4) \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .bind(role)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(profile)
    }
}
