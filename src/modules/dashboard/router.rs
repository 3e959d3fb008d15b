use axum::{Router, middleware, routing::get};

use shoky_access::PROTECTED_ROUTES;

use super::controller::{auth_page, index, page};
use crate::middleware::guard::guard_route;
use crate::state::AppState;

/// Public pages plus one guarded route per protected page.
pub fn init_pages_router(state: AppState) -> Router<AppState> {
    let protected = PROTECTED_ROUTES
        .iter()
        .fold(Router::new(), |router, route| router.route(route.path, get(page)))
        .route_layer(middleware::from_fn_with_state(state, guard_route));

    Router::new()
        .route("/", get(index))
        .route("/auth", get(auth_page))
        .merge(protected)
}
