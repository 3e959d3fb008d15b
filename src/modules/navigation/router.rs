use axum::{Router, routing::get};

use super::controller::get_navigation;
use crate::state::AppState;

pub fn init_navigation_router() -> Router<AppState> {
    Router::new().route("/", get(get_navigation))
}
