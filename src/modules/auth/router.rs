use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{auth_state, login, logout};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/state", get(auth_state))
}
