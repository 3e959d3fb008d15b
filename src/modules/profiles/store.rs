//! PostgreSQL implementation of the [`ProfileStore`] port.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use shoky_auth::{ProfileStore, ProfileStoreError};
use shoky_models::{Profile, Role};

use super::service::ProfileService;

#[derive(Clone, Debug)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Connection failures are transient; a row that does not decode into the
/// closed enums is an integrity error and is never retried.
pub fn classify(err: sqlx::Error) -> ProfileStoreError {
    match err {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            ProfileStoreError::Integrity(err.to_string())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ProfileStoreError::Unavailable(err.to_string()),
        other => ProfileStoreError::Internal(other.to_string()),
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn fetch_profile_by_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Profile>, ProfileStoreError> {
        ProfileService::fetch_profile(&self.db, user_id)
            .await
            .map_err(classify)
    }

    async fn update_profile_role(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<(), ProfileStoreError> {
        let result =
            sqlx::query("UPDATE profiles SET role = $2, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .bind(role)
                .execute(&self.db)
                .await
                .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(ProfileStoreError::NotFound(user_id));
        }
        Ok(())
    }
}
