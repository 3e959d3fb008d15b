use sqlx::PgPool;

use shoky_config::{CorsConfig, JwtConfig, SessionConfig};
use shoky_db::init_db_pool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub session_config: SessionConfig,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        session_config: SessionConfig::from_env(),
    }
}
