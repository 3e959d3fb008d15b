use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use shoky_auth::{create_session_token, verify_session_token};
use shoky_config::JwtConfig;
use shoky_core::{AppError, verify_password};
use shoky_models::{LoginRequest, Session};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct SessionService;

impl SessionService {
    /// Verifies credentials and opens a new server-side session.
    #[instrument(skip(db, jwt_config), fields(email = %dto.email))]
    pub async fn sign_in(
        db: &PgPool,
        dto: &LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<Session, AppError> {
        #[derive(sqlx::FromRow)]
        struct Credentials {
            id: Uuid,
            email: String,
            password: String,
        }

        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, email, password FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&dto.password, &credentials.password)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let expires_at = Utc::now() + Duration::seconds(jwt_config.access_token_expiry);

        let session_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO sessions (user_id, expires_at) VALUES ($1, $2) RETURNING id",
        )
        .bind(credentials.id)
        .bind(expires_at)
        .fetch_one(db)
        .await?;

        sqlx::query("UPDATE profiles SET last_login_at = NOW() WHERE id = $1")
            .bind(credentials.id)
            .execute(db)
            .await?;

        let access_token = create_session_token(
            credentials.id,
            session_id,
            &credentials.email,
            expires_at,
            jwt_config,
        )?;

        Ok(Session {
            id: session_id,
            user_id: credentials.id,
            email: credentials.email,
            access_token,
            expires_at,
        })
    }

    /// Resolves a bearer token to a live session.
    ///
    /// `Ok(None)` for bad signatures, expired tokens and revoked or expired
    /// session rows. `Err` only when the database could not be asked.
    #[instrument(skip_all)]
    pub async fn find_active_session(
        db: &PgPool,
        token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<Option<Session>, AppError> {
        let claims = match verify_session_token(token, jwt_config) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(error = %err.error, "Rejected session token");
                return Ok(None);
            }
        };
        let (Ok(user_id), Ok(session_id)) = (claims.user_id(), claims.session_id()) else {
            debug!("Session token carries malformed ids");
            return Ok(None);
        };

        let expires_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT expires_at FROM sessions \
             WHERE id = $1 AND user_id = $2 AND revoked_at IS NULL AND expires_at > NOW()",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(expires_at.map(|expires_at| Session {
            id: session_id,
            user_id,
            email: claims.email,
            access_token: token.to_string(),
            expires_at,
        }))
    }

    /// Revokes a session. Revoking twice is not an error.
    #[instrument(skip(db))]
    pub async fn sign_out(db: &PgPool, session_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
            .bind(session_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
