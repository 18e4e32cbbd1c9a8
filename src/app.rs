use axum::Router;

use crate::routes;
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    routes::create_routes(state)
}
