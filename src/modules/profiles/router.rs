use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{get_my_profile, upgrade_my_profile};
use crate::state::AppState;

pub fn init_profiles_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_my_profile))
        .route("/me/upgrade", post(upgrade_my_profile))
}
