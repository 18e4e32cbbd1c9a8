use axum::Router;

use crate::state::AppState;

mod auth_middleware;
mod game;

pub use game::{GenericActionRequest, NightActionRequest, VoteRequest};

pub fn create_routes(state: AppState) -> Router {
    Router::new().nest("/api/game", game::routes(state))
}
